use crate::config::Target;
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "retouch",
    about = "Resize a folder tree of images to a fixed size under a file-size ceiling",
    long_about = "retouch walks an input folder, resizes every JPEG/PNG to exact pixel dimensions, \
                  lowers JPEG quality step by step (or optimizes PNG) until each file fits under \
                  a size ceiling, and writes the results into a mirrored output folder. \
                  Run without arguments to process ./untouched into ./retouched at 506x718, 250 KB, JPEG.",
    version,
    after_help = "EXAMPLES:\n  \
    retouch\n  \
    retouch batch -i ./photos -o ./web -w 800 -H 600 -s 150\n  \
    retouch batch -f png\n  \
    retouch compress cover.png cover.jpg -s 120"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(
        short = 'q',
        long,
        global = true,
        help = "Only print errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Print every quality attempt",
        long_help = "Trace each encoding attempt with its quality setting and resulting size."
    )]
    pub verbose: bool,
}

/// Target overrides shared by every command; unset values use the defaults.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct TargetArgs {
    #[arg(short = 'w', long, help = "Target width in pixels (default: 506)")]
    pub width: Option<u32>,

    #[arg(short = 'H', long, help = "Target height in pixels (default: 718)")]
    pub height: Option<u32>,

    #[arg(
        short = 's',
        long = "max-size",
        value_name = "KB",
        help = "Size ceiling in kilobytes (default: 250)",
        long_help = "Maximum output size in kilobytes (1 KB = 1024 bytes). \
                     JPEG quality is lowered from 95 in steps of 5, down to 10, until the file fits. \
                     PNG is optimized once; if it is still too large a warning is printed."
    )]
    pub max_size_kb: Option<u64>,

    #[arg(short = 'f', long, help = "Output format: jpeg or png (default: jpeg)")]
    pub format: Option<String>,
}

impl TargetArgs {
    pub fn to_target(&self) -> Result<Target> {
        Target::from_overrides(
            self.width,
            self.height,
            self.max_size_kb,
            self.format.as_deref(),
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Process a whole folder tree (the default command)",
        long_about = "Process every .jpg/.jpeg/.png under the input folder, mirroring its \
                      sub-folders under the output folder. A failing file is reported and \
                      skipped; the run always completes."
    )]
    Batch {
        #[arg(short = 'i', long, help = "Input folder (default: untouched)")]
        input: Option<PathBuf>,

        #[arg(short = 'o', long, help = "Output folder (default: retouched)")]
        output: Option<PathBuf>,

        #[arg(
            long,
            help = "List what would be written without encoding anything",
            long_help = "Walk the input folder and print each input/output pair. \
                         The mirrored output folders are still created."
        )]
        dry_run: bool,

        #[command(flatten)]
        target: TargetArgs,
    },

    #[command(about = "Resize and compress a single image file")]
    Compress {
        #[arg(help = "Input image file path")]
        input: PathBuf,

        #[arg(help = "Output image file path")]
        output: PathBuf,

        #[command(flatten)]
        target: TargetArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::OutputFormat;

    #[test]
    fn test_no_arguments_means_default_batch() {
        let args = Args::try_parse_from(["retouch"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.quiet);
        assert!(!args.verbose);
    }

    #[test]
    fn test_batch_arguments() {
        let args = Args::try_parse_from([
            "retouch", "batch", "-i", "in", "-o", "out", "-w", "10", "-H", "20", "-s", "30", "-f",
            "png", "-q",
        ])
        .unwrap();

        assert!(args.quiet);
        match args.command {
            Some(Commands::Batch {
                input,
                output,
                dry_run,
                target,
            }) => {
                assert_eq!(input, Some(PathBuf::from("in")));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(!dry_run);
                let target = target.to_target().unwrap();
                assert_eq!(target, Target::new(10, 20, 30, OutputFormat::Png).unwrap());
            }
            _ => panic!("expected batch command"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["retouch", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_compress_requires_paths() {
        assert!(Args::try_parse_from(["retouch", "compress"]).is_err());
        assert!(Args::try_parse_from(["retouch", "compress", "a.png", "b.jpg"]).is_ok());
    }
}
