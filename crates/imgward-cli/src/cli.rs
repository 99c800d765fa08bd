//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use imgward_core::ScanConfig;
use imgward_core::config::DEFAULT_MAX_TAG_LENGTH;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "imgward")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory of images and write a Markdown report
    Scan(ScanArgs),
    /// Classify a single file without writing a report
    Check(CheckArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Subcommand name, used to label JSON output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scan(_) => "scan",
            Self::Check(_) => "check",
            Self::Completion { .. } => "completion",
        }
    }
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Directory to scan (not recursive)
    #[arg(value_name = "INPUT_DIR", default_value = "images")]
    pub input_dir: PathBuf,

    /// Report destination
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "reports/image_scan_report.md"
    )]
    pub output: PathBuf,

    /// Exit with status 1 if any file is flagged
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub classify: ClassifyArgs,
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Image file to classify
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Exit with status 1 if the file is flagged
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub classify: ClassifyArgs,
}

/// Options shared by every command that classifies files.
#[derive(clap::Args)]
pub struct ClassifyArgs {
    /// Flag metadata values longer than this many characters
    #[arg(long, value_name = "CHARS", default_value_t = DEFAULT_MAX_TAG_LENGTH)]
    pub max_tag_length: usize,

    /// Code token to look for in metadata, case-insensitive (repeatable;
    /// replaces the built-in list)
    #[arg(long = "pattern", value_name = "TOKEN")]
    pub patterns: Vec<String>,

    /// Antivirus scanner executable
    #[arg(long, value_name = "PATH", default_value = "clamscan")]
    pub clamscan: PathBuf,

    /// Extra argument passed to the scanner before the file path (repeatable)
    #[arg(long = "clamscan-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub clamscan_args: Vec<String>,

    /// Stop the scanner after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub av_timeout: Option<u64>,
}

impl ClassifyArgs {
    /// Applies the classification options on top of `config`.
    pub fn apply(&self, config: &mut ScanConfig) {
        config.max_tag_length = self.max_tag_length;
        if !self.patterns.is_empty() {
            config.code_patterns.clone_from(&self.patterns);
        }
        config.antivirus.program.clone_from(&self.clamscan);
        config.antivirus.args.clone_from(&self.clamscan_args);
        config.antivirus.timeout = self.av_timeout.map(Duration::from_secs);
    }
}

impl ScanArgs {
    /// Builds the scan configuration from the parsed flags.
    pub fn to_config(&self) -> ScanConfig {
        let mut config = ScanConfig {
            input_dir: self.input_dir.clone(),
            output_path: self.output.clone(),
            ..ScanConfig::default()
        };
        self.classify.apply(&mut config);
        config
    }
}

impl CheckArgs {
    /// Builds the classification configuration from the parsed flags.
    pub fn to_config(&self) -> ScanConfig {
        let mut config = ScanConfig::default();
        self.classify.apply(&mut config);
        config
    }
}
