//! Unix terminal implementation
//!
//! Raw mode via termios, a polled stdin reader and the `TIOCGWINSZ` ioctl.

use std::io;
use std::os::fd::AsFd;

use nix::errno::Errno;
use nix::libc::{self, STDIN_FILENO, STDOUT_FILENO};
use nix::poll::{poll, PollFd, PollFlags};
use nix::sys::termios::{
    self, ControlFlags, InputFlags, LocalFlags, OutputFlags, SetArg, SpecialCharacterIndices,
    Termios,
};
use nix::unistd::read;

use super::{TermError, TermResult, WindowSize};
use crate::input::ByteSource;

/// RAII guard for raw terminal mode
///
/// The original attributes are restored when the guard is dropped, which
/// covers normal exit, error returns and unwinding panics alike.
pub struct RawMode {
    original: Termios,
}

impl RawMode {
    /// Switch stdin to raw mode
    pub fn enable() -> TermResult<Self> {
        let original = termios::tcgetattr(io::stdin()).map_err(TermError::GetAttributes)?;

        let mut raw = original.clone();

        // No break signal, CR translation, parity checks, stripping or flow control
        raw.input_flags.remove(
            InputFlags::BRKINT
                | InputFlags::ICRNL
                | InputFlags::INPCK
                | InputFlags::ISTRIP
                | InputFlags::IXON,
        );
        // No "\n" to "\r\n" translation on output
        raw.output_flags.remove(OutputFlags::OPOST);
        raw.control_flags.insert(ControlFlags::CS8);
        // No echo, canonical mode, signals or literal-next
        raw.local_flags.remove(
            LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::ISIG | LocalFlags::IEXTEN,
        );

        // read() returns as soon as any input is available, or after 100ms
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 0;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 1;

        termios::tcsetattr(io::stdin(), SetArg::TCSAFLUSH, &raw)
            .map_err(TermError::SetAttributes)?;

        tracing::debug!("raw mode enabled");
        Ok(Self { original })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = termios::tcsetattr(io::stdin(), SetArg::TCSAFLUSH, &self.original) {
            tracing::warn!("Failed to restore terminal attributes: {}", e);
        }
    }
}

/// Stdin as a [`ByteSource`] with a poll deadline per byte
#[derive(Debug, Clone, Copy)]
pub struct StdinSource {
    timeout_ms: i32,
}

impl StdinSource {
    /// Create a source that waits at most `timeout_ms` for each byte
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms: i32::try_from(timeout_ms).unwrap_or(i32::MAX),
        }
    }
}

impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let stdin = io::stdin();
        let borrowed_fd = stdin.as_fd();
        let mut fds = [PollFd::new(&borrowed_fd, PollFlags::POLLIN)];
        match poll(&mut fds, self.timeout_ms) {
            Ok(0) | Err(Errno::EINTR) => return Ok(None),
            Ok(_) => {},
            Err(e) => return Err(e.into()),
        }

        let mut buf = [0u8; 1];
        match read(STDIN_FILENO, &mut buf) {
            Ok(1) => Ok(Some(buf[0])),
            // poll reported readable but nothing came back: the other end hung up
            Ok(_) => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
            // EAGAIN and EWOULDBLOCK are the same value on Linux
            Err(Errno::EAGAIN) | Err(Errno::EINTR) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Get the window size of stdout using ioctl
pub fn ioctl_window_size() -> Option<WindowSize> {
    let mut ws = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ is a valid ioctl for reading the window size into a winsize
    let result = unsafe { libc::ioctl(STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(WindowSize::new(ws.ws_col, ws.ws_row))
    } else {
        None
    }
}
