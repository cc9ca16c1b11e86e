use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "bfy",
    version,
    about = "Discover text files with gitignore awareness and .blobify overrides",
    long_about = "bfy recursively scans a directory for text files, honoring .gitignore when inside a git repository and layering .blobify context rules on top to re-include or exclude files."
)]
pub struct Cli {
    /// Directory to scan
    pub directory: PathBuf,

    /// Named .blobify context to apply
    #[arg(short = 'x', long = "context")]
    pub context: Option<String>,

    /// List contexts defined in the .blobify file and exit
    #[arg(long)]
    pub list_contexts: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable debug output for gitignore and .blobify processing
    #[arg(long)]
    pub debug: bool,
}
