pub const DEFAULT_INPUT_DIR: &str = "untouched";
pub const DEFAULT_OUTPUT_DIR: &str = "retouched";

pub const DEFAULT_TARGET_WIDTH: u32 = 506;
pub const DEFAULT_TARGET_HEIGHT: u32 = 718;
pub const DEFAULT_MAX_SIZE_KB: u64 = 250;

/// Bytes per kilobyte when comparing against the size ceiling.
pub const KIB: u64 = 1024;

// JPEG quality ladder: 95, 90, ..., 10
pub const JPEG_QUALITY_START: u8 = 95;
pub const JPEG_QUALITY_FLOOR: u8 = 10;
pub const JPEG_QUALITY_STEP: u8 = 5;

pub const PNG_OPTIMIZATION_PRESET: u8 = 6;
pub const LIBDEFLATER_MAX_LEVEL: u8 = 12;

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
pub const INFO_PREFIX: &str = "📋";
pub const SIZE_PREFIX: &str = "📊";
