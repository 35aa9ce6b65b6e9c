//! Mochi Editor
//!
//! Usage: `mochi-edit [FILE]`

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use mochi_edit::app::{init_logging, Config, LOG_ENV};
use mochi_edit::editor::{Editor, EditorResult, HELP_MESSAGE};
use mochi_edit::syntax::SyntaxRegistry;
use mochi_edit::term::{window_size, RawMode, StdinSource};

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("mochi-edit: cannot open {}: {}", LOG_ENV, e);
    }

    tracing::info!("Starting mochi-edit {}", env!("CARGO_PKG_VERSION"));

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Raw mode is already restored; leave a clean screen behind the report
            let mut stdout = io::stdout();
            let _ = stdout.write_all(b"\x1b[2J\x1b[H");
            let _ = stdout.flush();
            tracing::error!("Fatal error: {}", e);
            eprintln!("mochi-edit: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn run() -> EditorResult<()> {
    let config = Config::default();
    let _raw = RawMode::enable()?;

    let mut input = StdinSource::new(config.read_timeout_ms);
    let mut output = io::stdout().lock();
    let size = window_size(&mut input, &mut output)?;
    tracing::debug!(rows = size.rows, cols = size.cols, "window size");

    let mut editor = Editor::new(config, SyntaxRegistry::builtin(), size, input, output);
    if let Some(path) = std::env::args_os().nth(1) {
        editor.open(Path::new(&path))?;
    }
    editor.set_status_message(HELP_MESSAGE);
    editor.run()
}
