//! Mirrored directory traversal.
//!
//! [`MirrorWalker`] yields one [`MirrorPair`] per recognized image under the
//! input root. Every directory met during the walk gets its counterpart under
//! the output root before any of its files are yielded, whether or not it
//! holds images.

use crate::error::{CompressionError, Result};
use crate::formats::{is_image_file, OutputFormat};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// An input image and the path its processed copy is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorPair {
    pub input: PathBuf,
    pub output: PathBuf,
}

pub struct MirrorWalker {
    input_root: PathBuf,
    output_root: PathBuf,
    format: OutputFormat,
    entries: walkdir::IntoIter,
}

impl MirrorWalker {
    pub fn new(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        format: OutputFormat,
    ) -> Self {
        let input_root = input_root.into();
        let entries = WalkDir::new(&input_root).sort_by_file_name().into_iter();

        Self {
            input_root,
            output_root: output_root.into(),
            format,
            entries,
        }
    }

    fn mirror_directory(&self, dir: &Path) -> Result<()> {
        let relative = relative_to(&self.input_root, dir)?;
        let target = self.output_root.join(relative);
        fs::create_dir_all(&target)
            .map_err(|source| CompressionError::DirectoryCreationFailed { path: target, source })
    }
}

impl Iterator for MirrorWalker {
    type Item = Result<MirrorPair>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };

            if entry.file_type().is_dir() {
                if let Err(e) = self.mirror_directory(entry.path()) {
                    return Some(Err(e));
                }
                continue;
            }

            let path = entry.path();
            if !path.is_file() || !is_image_file(path) {
                continue;
            }

            let output = mirrored_output_path(&self.input_root, &self.output_root, path, self.format);
            return Some(output.map(|output| MirrorPair {
                input: entry.into_path(),
                output,
            }));
        }
    }
}

/// Maps `input` under `input_root` to the same relative location under
/// `output_root`, with the extension replaced by the output format's.
pub fn mirrored_output_path(
    input_root: &Path,
    output_root: &Path,
    input: &Path,
    format: OutputFormat,
) -> Result<PathBuf> {
    let relative = relative_to(input_root, input)?;
    if relative.file_stem().is_none() {
        return Err(CompressionError::InvalidPath(input.to_path_buf()));
    }
    Ok(output_root.join(relative).with_extension(format.extension()))
}

fn relative_to<'a>(root: &Path, path: &'a Path) -> Result<&'a Path> {
    path.strip_prefix(root)
        .map_err(|_| CompressionError::InvalidPath(path.to_path_buf()))
}
