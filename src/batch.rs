use crate::config::BatchConfig;
use crate::constants::{INFO_PREFIX, SIZE_PREFIX, SUCCESS_PREFIX};
use crate::error::Result;
use crate::processing::{
    ceiling_missed_message, compress, CompressionOutcome, CompressionReport, CompressionRequest,
};
use crate::utils::{calculate_compression_ratio, create_progress_bar, format_file_size};
use crate::walker::{MirrorPair, MirrorWalker};
use crate::{error, info, warn};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Per-run tallies. `failed` counts files whose processing raised an error;
/// `walk_errors` counts entries the traversal itself could not read or mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub discovered: usize,
    pub satisfied: usize,
    pub ceiling_missed: usize,
    pub failed: usize,
    pub walk_errors: usize,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Files that ended with an output on disk.
    pub fn processed(&self) -> usize {
        self.satisfied + self.ceiling_missed
    }

    fn record(&mut self, report: &CompressionReport) {
        match report.outcome {
            CompressionOutcome::Satisfied => self.satisfied += 1,
            CompressionOutcome::SizeCeilingMissed => self.ceiling_missed += 1,
        }
        self.input_bytes += report.original_size;
        self.output_bytes += report.output_size;
    }
}

/// Resizes and compresses every image under `config.input_root` into the
/// mirrored tree under `config.output_root`.
///
/// Files are handled one after another in traversal order. No per-file
/// failure stops the run, and none is returned: the outcome of each file is
/// logged and tallied in the returned [`BatchSummary`].
pub fn process_tree(config: &BatchConfig) -> BatchSummary {
    let target = &config.target;
    info!("🚀 Starting batch resize...");
    info!("📁 Input: {:?}", config.input_root);
    info!("📁 Output: {:?}", config.output_root);
    info!(
        "{} Target: {}x{} {}, at most {} KB",
        INFO_PREFIX, target.width, target.height, target.format, target.max_size_kb
    );

    let start_time = Instant::now();
    let mut summary = BatchSummary::default();

    if !config.input_root.is_dir() {
        warn!(
            "Input directory {:?} does not exist, nothing to process",
            config.input_root
        );
        summary.elapsed = start_time.elapsed();
        return summary;
    }

    let pairs = collect_pairs(config, &mut summary);
    summary.discovered = pairs.len();

    if pairs.is_empty() {
        warn!("No image files found in the input directory");
    } else {
        info!("{} Found {} image files to process", SIZE_PREFIX, pairs.len());
    }

    let progress = create_progress_bar(pairs.len() as u64);

    for pair in &pairs {
        let request = CompressionRequest::new(&pair.input, &pair.output, target);
        match compress(&request) {
            Ok(report) => {
                progress.suspend(|| log_report(&request, &report));
                summary.record(&report);
            }
            Err(e) => {
                progress.suspend(|| {
                    error!("Failed to process {:?}: {}", pair.input, e);
                });
                summary.failed += 1;
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    summary.elapsed = start_time.elapsed();
    print_summary(&summary);

    summary
}

/// Walks the input tree, creating the mirrored directories as it goes.
/// Traversal errors are logged and counted; the walk carries on past them.
fn collect_pairs(config: &BatchConfig, summary: &mut BatchSummary) -> Vec<MirrorPair> {
    let mut pairs = Vec::new();
    let mut seen_outputs = HashSet::new();

    let walker = MirrorWalker::new(
        &config.input_root,
        &config.output_root,
        config.target.format,
    );

    for entry in walker {
        match entry {
            Ok(pair) => {
                if !seen_outputs.insert(pair.output.clone()) {
                    warn!(
                        "{:?} maps to {:?}, which an earlier file also writes; the later file wins",
                        pair.input, pair.output
                    );
                }
                pairs.push(pair);
            }
            Err(e) => {
                error!("Failed to read input tree: {}", e);
                summary.walk_errors += 1;
            }
        }
    }

    pairs
}

fn log_report(request: &CompressionRequest, report: &CompressionReport) {
    if report.outcome == CompressionOutcome::SizeCeilingMissed {
        warn!("{}", ceiling_missed_message(request, report));
    }

    let setting = match report.quality {
        Some(quality) => format!("quality {}", quality),
        None => "optimized".to_string(),
    };
    info!(
        "{} Processed: {:?} -> {:?} ({}, {})",
        SUCCESS_PREFIX,
        request.input_path,
        request.output_path,
        format_file_size(report.output_size),
        setting
    );
}

fn print_summary(summary: &BatchSummary) {
    let ratio = calculate_compression_ratio(summary.input_bytes, summary.output_bytes);
    let seconds = summary.elapsed.as_secs_f64();

    info!("\n📊 Batch Summary:");
    info!("  📁 Images found: {}", summary.discovered);
    info!("  ✅ Within size ceiling: {}", summary.satisfied);
    info!("  ⚠️  Over size ceiling: {}", summary.ceiling_missed);
    info!("  ❌ Failed: {}", summary.failed);
    if summary.walk_errors > 0 {
        info!("  🚧 Unreadable entries: {}", summary.walk_errors);
    }
    info!(
        "  📊 Total size: {} -> {}",
        format_file_size(summary.input_bytes),
        format_file_size(summary.output_bytes)
    );
    info!("  🎯 Overall compression ratio: {:.1}%", ratio);
    info!("  ⏱️  Total time: {:?}", summary.elapsed);
    if seconds > 0.0 {
        info!(
            "  ⚡ Average speed: {:.2} files/second",
            summary.processed() as f64 / seconds
        );
    }
}

/// Convenience wrapper: lists the pairs a run would process without
/// compressing anything. Output directories are still created.
pub fn plan_tree(config: &BatchConfig) -> Result<Vec<MirrorPair>> {
    MirrorWalker::new(
        &config.input_root,
        &config.output_root,
        config.target.format,
    )
    .collect()
}
