//! Run configuration.
//!
//! Everything a batch needs is carried in a [`BatchConfig`] value handed to
//! [`crate::batch::process_tree`]; nothing is read from process-wide state.

use crate::constants::{
    DEFAULT_INPUT_DIR, DEFAULT_MAX_SIZE_KB, DEFAULT_OUTPUT_DIR, DEFAULT_TARGET_HEIGHT,
    DEFAULT_TARGET_WIDTH,
};
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use std::path::PathBuf;

/// Target dimensions, size ceiling and format applied to every image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub width: u32,
    pub height: u32,
    pub max_size_kb: u64,
    pub format: OutputFormat,
}

impl Target {
    pub fn new(width: u32, height: u32, max_size_kb: u64, format: OutputFormat) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CompressionError::InvalidDimensions(width, height));
        }
        if max_size_kb == 0 {
            return Err(CompressionError::InvalidSizeCeiling(max_size_kb));
        }

        Ok(Self {
            width,
            height,
            max_size_kb,
            format,
        })
    }

    /// Builds a target from optional overrides, falling back to the defaults.
    pub fn from_overrides(
        width: Option<u32>,
        height: Option<u32>,
        max_size_kb: Option<u64>,
        format: Option<&str>,
    ) -> Result<Self> {
        let format = match format {
            Some(fmt) => fmt.parse::<OutputFormat>()?,
            None => OutputFormat::default(),
        };

        Self::new(
            width.unwrap_or(DEFAULT_TARGET_WIDTH),
            height.unwrap_or(DEFAULT_TARGET_HEIGHT),
            max_size_kb.unwrap_or(DEFAULT_MAX_SIZE_KB),
            format,
        )
    }
}

impl Default for Target {
    fn default() -> Self {
        Self {
            width: DEFAULT_TARGET_WIDTH,
            height: DEFAULT_TARGET_HEIGHT,
            max_size_kb: DEFAULT_MAX_SIZE_KB,
            format: OutputFormat::Jpeg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub target: Target,
}

impl BatchConfig {
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>, target: Target) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            target,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, Target::default())
    }
}
