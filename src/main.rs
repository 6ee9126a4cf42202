mod backend;
mod classify;
mod cli;
mod controller;
mod picker;
mod report;
mod store;
mod ui;

use crate::backend::GitBackend;
use crate::cli::Cli;
use crate::controller::StatusController;
use crate::picker::ListPicker;
use crate::store::JsonExclusionStore;
use crate::ui::TerminalNotifier;
use anyhow::{Result, bail};
use std::io::IsTerminal;
use std::path::Path;

fn main() {
    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // sanity checks
    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        bail!("interactive terminal required");
    }

    let backend = GitBackend::discover(Path::new("."))?;
    let mut store = JsonExclusionStore::open(backend.workdir())?;
    let picker = ListPicker;
    let notifier = TerminalNotifier;

    // cycles run until the backend errors, the workspace is clean, or the
    // user hits ctrl-c inside the picker
    let mut controller = StatusController::new(&backend, &mut store, &picker, &notifier);
    controller.run(&cli.paths, !cli.no_recursive);

    Ok(())
}
