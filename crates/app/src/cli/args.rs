pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "feedboard")]
#[command(about = "Publish feedback boards to a content-addressed registry")]
pub struct Args {
    /// Registry API to talk to (defaults to the configured local daemon)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the feedboard config directory (defaults to ~/.feedboard)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
