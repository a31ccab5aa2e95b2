pub mod logger;

pub mod batch;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod formats;
pub mod processing;
pub mod utils;
pub mod walker;

pub use batch::{plan_tree, process_tree, BatchSummary};
pub use config::{BatchConfig, Target};
pub use error::{CompressionError, Result};
pub use formats::{is_image_file, OutputFormat};
pub use processing::{
    compress, compress_image, encode_jpeg, encode_png, load_image_with_metadata, normalize_color,
    resize_image, search_quality, validate_file_exists, CompressionOutcome, CompressionReport,
    CompressionRequest, QualitySearch,
};
pub use walker::{mirrored_output_path, MirrorPair, MirrorWalker};
