#![allow(dead_code)]

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Deterministic xorshift noise; JPEG can't shrink it much, which makes the
/// quality ladder actually work.
pub fn noise_rgb(width: u32, height: u32, seed: u32) -> RgbImage {
    let mut state = seed.max(1);
    RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state & 0xFF) as u8
        };
        Rgb([next(), next(), next()])
    })
}

pub fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
            (x % 256) as u8,
        ])
    })
}

pub fn write_noise_png(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    noise_rgb(width, height, width ^ height).save(path).unwrap();
}

pub fn write_rgba_png(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    gradient_rgba(width, height).save(path).unwrap();
}

pub fn write_text(path: &Path, contents: &str) {
    ensure_parent(path);
    fs::write(path, contents).unwrap();
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// Lays out `untouched/` with nested images, a corrupt file and a text file.
pub fn create_input_tree(root: &Path) -> PathBuf {
    let input = root.join("untouched");
    write_rgba_png(&input.join("a/b/photo.png"), 640, 480);
    write_noise_png(&input.join("a/noise.PNG"), 200, 150);
    write_text(&input.join("a/readme.txt"), "not an image");
    fs::create_dir_all(input.join("empty")).unwrap();
    input
}

/// Relative paths of every file under `root`, sorted.
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}
