//! Terminal handling
//!
//! Raw mode acquisition, the stdin byte source used by the key decoder, and
//! window size discovery.

#[cfg(unix)]
mod unix;

use std::io::Write;

#[cfg(unix)]
pub use unix::{ioctl_window_size, RawMode, StdinSource};

use crate::input::ByteSource;

/// Error type for terminal operations
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    #[error("Failed to get terminal attributes: {0}")]
    GetAttributes(#[source] nix::Error),

    #[error("Failed to set terminal attributes: {0}")]
    SetAttributes(#[source] nix::Error),

    #[error("Failed to determine the window size")]
    WindowSize,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for terminal operations
pub type TermResult<T> = Result<T, TermError>;

/// Terminal window size in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: u16,
    pub cols: u16,
}

impl WindowSize {
    /// Create a new window size
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { rows, cols }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Query the window size, falling back to the cursor position report
///
/// When the ioctl is unavailable the cursor is pushed to the bottom-right
/// corner and the terminal is asked where it ended up.
#[cfg(unix)]
pub fn window_size<S, W>(input: &mut S, output: &mut W) -> TermResult<WindowSize>
where
    S: ByteSource + ?Sized,
    W: Write + ?Sized,
{
    if let Some(size) = ioctl_window_size() {
        return Ok(size);
    }
    tracing::debug!("TIOCGWINSZ unavailable, querying cursor position");
    output.write_all(b"\x1b[999C\x1b[999B")?;
    cursor_position(input, output)
}

/// Ask the terminal for the cursor position (`ESC [ 6 n`)
pub fn cursor_position<S, W>(input: &mut S, output: &mut W) -> TermResult<WindowSize>
where
    S: ByteSource + ?Sized,
    W: Write + ?Sized,
{
    output.write_all(b"\x1b[6n")?;
    output.flush()?;

    let mut report = Vec::with_capacity(32);
    while report.len() < 31 {
        match input.read_byte()? {
            Some(b'R') => break,
            Some(byte) => report.push(byte),
            None => break,
        }
    }

    parse_cursor_report(&report).ok_or(TermError::WindowSize)
}

/// Parse the body of a cursor position report (`ESC [ rows ; cols`, without the `R`)
pub fn parse_cursor_report(report: &[u8]) -> Option<WindowSize> {
    let body = report.strip_prefix(b"\x1b[")?;
    let body = std::str::from_utf8(body).ok()?;
    let (rows, cols) = body.split_once(';')?;
    let rows = rows.parse().ok()?;
    let cols = cols.parse().ok()?;
    Some(WindowSize { rows, cols })
}
