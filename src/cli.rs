use clap::Parser;
use std::path::PathBuf;

/// git-status-picker: list pending changes and toggle per-file checkin exclusions
#[derive(Parser, Debug)]
#[command(name = "git-status-picker", about, long_about = None)]
pub struct Cli {
    /// file(s) and folder(s) to get status of (defaults to the whole workspace)
    pub paths: Vec<PathBuf>,

    /// do not recurse into untracked directories
    #[arg(long)]
    pub no_recursive: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
