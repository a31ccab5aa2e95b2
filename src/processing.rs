use crate::config::Target;
use crate::constants::{
    JPEG_QUALITY_FLOOR, JPEG_QUALITY_START, JPEG_QUALITY_STEP, KIB, LIBDEFLATER_MAX_LEVEL,
    PNG_OPTIMIZATION_PRESET,
};
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use crate::utils::{create_progress_spinner, format_file_size, print_compression_result};
use crate::{info, verbose, warn};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use oxipng::{Deflaters, Options};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One file's worth of work: where to read, where to write, and what the
/// result has to look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub target_width: u32,
    pub target_height: u32,
    pub max_size_kb: u64,
    pub output_format: OutputFormat,
}

impl CompressionRequest {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>, target: &Target) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            target_width: target.width,
            target_height: target.height,
            max_size_kb: target.max_size_kb,
            output_format: target.format,
        }
    }

    pub fn target(&self) -> Result<Target> {
        Target::new(
            self.target_width,
            self.target_height,
            self.max_size_kb,
            self.output_format,
        )
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_size_kb.saturating_mul(KIB)
    }
}

/// Terminal state of a file that made it through encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionOutcome {
    /// The written file is at or under the size ceiling.
    Satisfied,
    /// The ceiling could not be met; the smallest attempt was kept.
    SizeCeilingMissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionReport {
    pub outcome: CompressionOutcome,
    /// JPEG quality of the written file, `None` for PNG.
    pub quality: Option<u8>,
    pub attempts: usize,
    pub original_size: u64,
    pub output_size: u64,
    pub dimensions: (u32, u32),
}

impl CompressionReport {
    pub fn is_satisfied(&self) -> bool {
        self.outcome == CompressionOutcome::Satisfied
    }
}

/// Result of walking the JPEG quality ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualitySearch {
    pub quality: u8,
    pub encoded: Vec<u8>,
    pub attempts: usize,
    pub satisfied: bool,
}

/// Validates that a file exists at the given path.
///
/// # Example
/// ```
/// use std::path::Path;
/// use retouch::validate_file_exists;
///
/// let result = validate_file_exists(Path::new("nonexistent.jpg"));
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CompressionError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Resizes one image to the request's exact dimensions and writes it under
/// the size ceiling if any allowed setting gets there.
///
/// The pipeline is decode -> flatten color -> resize -> encode -> write.
/// A missed ceiling is reported through [`CompressionOutcome`], not as an
/// error; errors are reserved for decode, encode and I/O failures. Output is
/// written through a temporary file in the destination directory, so a
/// failure never leaves a truncated file at `output_path`.
pub fn compress(request: &CompressionRequest) -> Result<CompressionReport> {
    request.target()?;

    let (img, original_size) = load_image_with_metadata(&request.input_path)?;
    let mut img = normalize_color(img);
    resize_image(&mut img, request.target_width, request.target_height);

    let (encoded, quality, attempts, satisfied) = match request.output_format {
        OutputFormat::Jpeg => {
            let search = search_quality(request.max_bytes(), |quality| encode_jpeg(&img, quality))?;
            (search.encoded, Some(search.quality), search.attempts, search.satisfied)
        }
        OutputFormat::Png => {
            let encoded = encode_png(&img)?;
            let satisfied = encoded.len() as u64 <= request.max_bytes();
            (encoded, None, 1, satisfied)
        }
    };

    write_output(&request.output_path, &encoded)?;

    let outcome = if satisfied {
        CompressionOutcome::Satisfied
    } else {
        CompressionOutcome::SizeCeilingMissed
    };

    Ok(CompressionReport {
        outcome,
        quality,
        attempts,
        original_size,
        output_size: encoded.len() as u64,
        dimensions: img.dimensions(),
    })
}

/// Loads an image file and returns it along with its size on disk.
///
/// The decoder is picked from the file contents, so a PNG saved with a
/// `.jpg` extension still loads.
pub fn load_image_with_metadata(input_path: &Path) -> Result<(DynamicImage, u64)> {
    validate_file_exists(input_path)?;

    let file_size = fs::metadata(input_path)?.len();
    let img = ImageReader::open(input_path)?
        .with_guessed_format()?
        .decode()?;

    Ok((img, file_size))
}

/// Flattens the image to 8-bit opaque color.
///
/// Anything carrying alpha becomes RGB with the alpha dropped, not
/// composited: a transparent pixel keeps whatever color it stored. Opaque
/// grayscale stays grayscale.
pub fn normalize_color(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => img,
        DynamicImage::ImageLuma16(_) => DynamicImage::ImageLuma8(img.to_luma8()),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Scales to exactly `width` x `height`, ignoring the source aspect ratio.
pub fn resize_image(img: &mut DynamicImage, width: u32, height: u32) {
    if img.dimensions() == (width, height) {
        return;
    }
    verbose!(
        "Resizing {}x{} -> {}x{}",
        img.width(),
        img.height(),
        width,
        height
    );
    *img = img.resize_exact(width, height, FilterType::Lanczos3);
}

/// Descends the JPEG quality ladder (95, 90, ..., 10) until an encoding fits
/// in `max_bytes` or the floor is reached.
///
/// The last attempt is returned either way; `satisfied` tells them apart.
pub fn search_quality<F>(max_bytes: u64, mut encode: F) -> Result<QualitySearch>
where
    F: FnMut(u8) -> Result<Vec<u8>>,
{
    let mut quality = JPEG_QUALITY_START;
    let mut attempts = 0;

    loop {
        let encoded = encode(quality)?;
        attempts += 1;

        let satisfied = encoded.len() as u64 <= max_bytes;
        verbose!(
            "quality {:>2}: {} ({})",
            quality,
            format_file_size(encoded.len() as u64),
            if satisfied { "fits" } else { "too large" }
        );

        if satisfied || quality <= JPEG_QUALITY_FLOOR {
            return Ok(QualitySearch {
                quality,
                encoded,
                attempts,
                satisfied,
            });
        }

        quality = quality
            .saturating_sub(JPEG_QUALITY_STEP)
            .max(JPEG_QUALITY_FLOOR);
    }
}

pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    img.write_with_encoder(encoder)?;
    Ok(buffer)
}

/// Encodes once, then runs oxipng at its strongest libdeflater setting.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut raw))?;

    let mut options = Options::from_preset(PNG_OPTIMIZATION_PRESET);
    options.deflate = Deflaters::Libdeflater {
        compression: LIBDEFLATER_MAX_LEVEL,
    };

    oxipng::optimize_from_memory(&raw, &options)
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))
}

/// Writes `bytes` to `output_path` atomically, creating the parent directory
/// if needed.
pub fn write_output(output_path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|source| CompressionError::DirectoryCreationFailed {
        path: parent.to_path_buf(),
        source,
    })?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.persist(output_path)?;
    Ok(())
}

/// Single-file entry point used by the `compress` command.
pub fn compress_image(input: &Path, output: &Path, target: &Target) -> Result<CompressionReport> {
    info!("🗜️  Compressing image: {:?}", input);
    info!("📁 Output: {:?}", output);

    let pb = create_progress_spinner("Resizing and encoding...");
    let request = CompressionRequest::new(input, output, target);
    let result = compress(&request);
    pb.finish_and_clear();
    let report = result?;

    info!(
        "📊 Original size: {} -> {}x{} {}",
        format_file_size(report.original_size),
        report.dimensions.0,
        report.dimensions.1,
        target.format
    );
    print_compression_result(report.original_size, report.output_size);

    if !report.is_satisfied() {
        warn!("{}", ceiling_missed_message(&request, &report));
    }

    Ok(report)
}

pub fn ceiling_missed_message(request: &CompressionRequest, report: &CompressionReport) -> String {
    match report.quality {
        Some(quality) => format!(
            "Could not compress {:?} below {} KB within the quality range; kept quality {} ({})",
            request.input_path,
            request.max_size_kb,
            quality,
            format_file_size(report.output_size)
        ),
        None => format!(
            "Could not compress {:?} below {} KB with {}; kept the optimized file ({})",
            request.input_path,
            request.max_size_kb,
            request.output_format,
            format_file_size(report.output_size)
        ),
    }
}
