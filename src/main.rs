use anyhow::{Context, Result};
use clap::Parser;
use retouch::batch::{plan_tree, process_tree};
use retouch::cli::{Args, Commands};
use retouch::config::BatchConfig;
use retouch::processing::compress_image;
use retouch::{info, logger};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::set_quiet_mode(args.quiet);
    logger::set_verbose_mode(args.verbose);

    match args.command {
        None => {
            process_tree(&BatchConfig::default());
        }
        Some(Commands::Batch {
            input,
            output,
            dry_run,
            target,
        }) => {
            let target = target.to_target().context("invalid batch parameters")?;
            let defaults = BatchConfig::default();
            let config = BatchConfig::new(
                input.unwrap_or(defaults.input_root),
                output.unwrap_or(defaults.output_root),
                target,
            );

            if dry_run {
                show_plan(&config)?;
            } else {
                process_tree(&config);
            }
        }
        Some(Commands::Compress {
            input,
            output,
            target,
        }) => {
            let target = target
                .to_target()
                .context("invalid compression parameters")?;
            compress_image(&input, &output, &target)
                .with_context(|| format!("failed to process {}", input.display()))?;
        }
    }

    Ok(())
}

fn show_plan(config: &BatchConfig) -> Result<()> {
    let pairs = plan_tree(config)
        .with_context(|| format!("failed to walk {}", config.input_root.display()))?;

    for pair in &pairs {
        info!("{} -> {}", pair.input.display(), pair.output.display());
    }
    info!("📋 {} image files would be processed", pairs.len());

    Ok(())
}
