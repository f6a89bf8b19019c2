use std::path::PathBuf;

use clap::{Parser, Subcommand};

use vrtlens::config::ConfigOverrides;

#[derive(Parser)]
#[command(
    name = "vrtlens",
    about = "Visual analysis and grading for screenshot regression tests"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create .vrtlens/config.toml with default settings
    Init {
        /// Overwrite existing config and gitignore
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the colour, structure and layout profile of one image
    Analyze {
        /// Image to analyse
        image: PathBuf,
        /// Print JSON instead of the human-readable summary
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        overrides: ConfigOverrides,
    },

    /// Compare a test image against its reference and grade the difference (exit 0/1)
    Compare {
        /// Reference (baseline) image
        #[arg(long)]
        reference: PathBuf,
        /// Test (candidate) image
        #[arg(long)]
        test: PathBuf,
        /// Write report.json and the difference map here
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Print JSON instead of the human-readable summary
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        overrides: ConfigOverrides,
    },

    /// Compare every image in a test directory against a reference directory (exit 0/1)
    Suite {
        /// Directory of reference images
        #[arg(long)]
        reference_dir: PathBuf,
        /// Directory of test images, matched by relative path
        #[arg(long)]
        test_dir: PathBuf,
        /// Where report.json, report.html and difference maps are written
        #[arg(long, short = 'o', default_value = ".vrtlens/output")]
        output: PathBuf,
        /// Only compare pairs whose ID contains PATTERN (case-insensitive)
        #[arg(long, short = 'f')]
        filter: Option<String>,
        /// Number of pairs analysed concurrently
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
        parallel: u16,
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
}
