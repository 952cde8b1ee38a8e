// SPDX-License-Identifier: MIT
//
// kilo — a small screen-oriented terminal text editor.
//
// This is the main binary that wires together the two crates:
//
//   kilo-term   → raw mode, key decoding, frame output, event loop
//   kilo-editor → rows, highlighting, buffer, search, viewport, Editor
//
// `Editor` implements kilo-term's `App` trait. Each keypress flows through:
//
//   stdin → parser → Editor::on_key → buffer mutation
//   paint → View::render → Frame → FrameWriter → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← h - 2 rows
//   ├──────────────────────────────┤
//   │ status line (INVERSE)        │  ← 1 row
//   ├──────────────────────────────┤
//   │ message / prompt line        │  ← 1 row
//   └──────────────────────────────┘

mod logging;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use kilo_editor::config::{DEFAULT_QUIT_TIMES, DEFAULT_TAB_STOP};
use kilo_editor::{Editor, EditorConfig};
use kilo_term::event_loop::EventLoop;

#[derive(Debug, Parser)]
#[command(name = "kilo", version, about)]
struct Cli {
    /// File to edit. A missing file is created on the first save.
    file: Option<PathBuf>,

    /// Display width of a tab stop.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TAB_STOP)]
    tab_stop: usize,

    /// Extra Ctrl-Q presses needed to quit with unsaved changes.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_QUIT_TIMES)]
    quit_times: usize,

    /// Write logs here instead of the per-user data directory.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> EditorConfig {
        EditorConfig::default()
            .with_tab_stop(self.tab_stop)
            .with_quit_times(self.quit_times)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut event_loop = EventLoop::new().context("failed to initialize terminal")?;
    let size = event_loop.size();
    let config = cli.config();

    let mut editor = match &cli.file {
        Some(path) => Editor::open(path, config, size)
            .with_context(|| format!("can't open {}", path.display()))?,
        None => Editor::new(config, size),
    };

    tracing::info!(cols = size.cols, rows = size.rows, ?config, "starting");
    event_loop.run(&mut editor).context("terminal I/O failed")?;
    tracing::info!("exiting");
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Logging is best effort; the editor runs without it.
    let log = logging::init(cli.log_file.as_deref()).ok();
    if let Some(log) = &log {
        tracing::debug!(path = %log.path.display(), "logging initialized");
    }

    let code = match run(&cli) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            eprintln!("kilo: {e:#}");
            1
        }
    };

    drop(log);
    process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["kilo"]);
        assert_eq!(cli.file, None);
        assert_eq!(cli.config(), EditorConfig::default());
    }

    #[test]
    fn file_and_overrides() {
        let cli = Cli::parse_from([
            "kilo",
            "main.c",
            "--tab-stop",
            "4",
            "--quit-times",
            "1",
            "--log-file",
            "/tmp/k.log",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("main.c")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/k.log")));
        let config = cli.config();
        assert_eq!(config.tab_stop, 4);
        assert_eq!(config.quit_times, 1);
    }

    #[test]
    fn zero_tab_stop_is_raised() {
        let cli = Cli::parse_from(["kilo", "--tab-stop", "0"]);
        assert_eq!(cli.config().tab_stop, 1);
    }
}
