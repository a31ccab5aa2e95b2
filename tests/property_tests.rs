use image::{DynamicImage, GenericImageView};
use proptest::prelude::*;
use retouch::config::Target;
use retouch::formats::{is_image_file, OutputFormat};
use retouch::processing::{normalize_color, resize_image, search_quality};
use retouch::walker::mirrored_output_path;
use std::path::{Path, PathBuf};

proptest! {
    #[test]
    fn resize_always_hits_exact_target(
        width in 1u32..=300u32,
        height in 1u32..=300u32,
        target_w in 1u32..=300u32,
        target_h in 1u32..=300u32
    ) {
        let mut img = DynamicImage::new_rgba8(width, height);
        img = normalize_color(img);
        resize_image(&mut img, target_w, target_h);

        prop_assert_eq!(img.dimensions(), (target_w, target_h));
        prop_assert!(!img.color().has_alpha());
    }

    #[test]
    fn quality_search_respects_ceiling_when_reachable(
        max_bytes in 1u64..=2000u64,
        bytes_per_step in 1usize..=40usize
    ) {
        // encoded size grows linearly with quality
        let search = search_quality(max_bytes, |q| Ok(vec![0u8; q as usize * bytes_per_step])).unwrap();

        prop_assert!(search.quality >= 10 && search.quality <= 95);
        prop_assert_eq!(search.quality % 5, 0);
        prop_assert_eq!(search.attempts, ((95 - search.quality) / 5 + 1) as usize);

        let reachable = (10 * bytes_per_step) as u64 <= max_bytes;
        prop_assert_eq!(search.satisfied, reachable);
        if reachable {
            prop_assert!(search.encoded.len() as u64 <= max_bytes);
            // the first fitting quality is taken, the one above it was too large
            if search.quality < 95 {
                let above = (search.quality as usize + 5) * bytes_per_step;
                prop_assert!(above as u64 > max_bytes);
            }
        } else {
            prop_assert_eq!(search.quality, 10);
        }
    }

    #[test]
    fn mirrored_path_keeps_relative_dirs(
        dirs in prop::collection::vec("[a-z0-9_]{1,8}", 0..4),
        stem in "[a-zA-Z0-9_-]{1,12}",
        ext in prop::sample::select(vec!["jpg", "JPG", "jpeg", "png", "PNG"]),
        png in any::<bool>()
    ) {
        let format = if png { OutputFormat::Png } else { OutputFormat::Jpeg };
        let relative: PathBuf = dirs.iter().collect();
        let input = Path::new("untouched").join(&relative).join(format!("{}.{}", stem, ext));

        prop_assert!(is_image_file(&input));

        let output = mirrored_output_path(Path::new("untouched"), Path::new("retouched"), &input, format).unwrap();
        let expected = Path::new("retouched").join(&relative).join(format!("{}.{}", stem, format.extension()));
        prop_assert_eq!(output, expected);
    }

    #[test]
    fn non_image_extensions_are_skipped(
        ext in prop::sample::select(vec!["txt", "md", "gif", "webp", "bmp", "tiff", "pdf"])
    ) {
        let filename = format!("file.{}", ext);
        prop_assert!(!is_image_file(Path::new(&filename)));
    }

    #[test]
    fn target_accepts_only_positive_values(
        width in 0u32..=2000u32,
        height in 0u32..=2000u32,
        max_size_kb in 0u64..=1000u64
    ) {
        let result = Target::new(width, height, max_size_kb, OutputFormat::Jpeg);
        prop_assert_eq!(result.is_ok(), width > 0 && height > 0 && max_size_kb > 0);
    }
}
