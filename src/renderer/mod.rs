//! Screen composition
//!
//! Builds one frame of terminal output into a reusable byte buffer: the
//! visible text rows with their colors, the inverted status bar, the
//! message bar and the final cursor placement. The caller writes the
//! buffer to the terminal in a single call so frames never tear.

use std::os::unix::ffi::OsStrExt;
use std::time::{Duration, Instant};

use crate::core::{Cursor, Document, Row};
use crate::syntax::Highlight;
use crate::viewport::Viewport;

/// Shown in the status bar for unnamed documents
pub const NO_NAME: &str = "[No name]";

/// Shown in the status bar when no syntax is selected
pub const NO_FILETYPE: &str = "no ft";

/// Longest filename prefix shown in the status bar
const STATUS_NAME_MAX: usize = 20;

/// A transient message for the message bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub time: Instant,
}

impl StatusMessage {
    /// Create a message stamped with the current time
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            time: Instant::now(),
        }
    }

    /// Check whether the message is still young enough to display
    pub fn visible(&self, timeout: Duration) -> bool {
        self.time.elapsed() < timeout
    }
}

/// Everything a frame is drawn from
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub document: &'a Document,
    pub viewport: &'a Viewport,
    pub cursor: Cursor,
    /// Message bar text, already filtered for age
    pub message: Option<&'a str>,
}

/// Composes frames into an escape-sequence byte buffer
#[derive(Debug, Default)]
pub struct Renderer {
    buf: Vec<u8>,
}

impl Renderer {
    /// Create a renderer with an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose a full frame and return its bytes
    pub fn compose(&mut self, frame: &Frame<'_>) -> &[u8] {
        self.buf.clear();
        self.push(b"\x1b[?25l");
        self.push(b"\x1b[H");

        self.draw_rows(frame);
        self.draw_status_bar(frame);
        self.draw_message_bar(frame);

        let render_col = frame.cursor.render_col(frame.document);
        let (y, x) = frame.viewport.screen_position(frame.cursor.row, render_col);
        self.push_fmt(format_args!("\x1b[{};{}H", y + 1, x + 1));
        self.push(b"\x1b[?25h");

        tracing::trace!(bytes = self.buf.len(), "composed frame");
        &self.buf
    }

    fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn push_fmt(&mut self, args: std::fmt::Arguments<'_>) {
        self.buf.extend_from_slice(args.to_string().as_bytes());
    }

    fn draw_rows(&mut self, frame: &Frame<'_>) {
        let view = frame.viewport;
        for y in 0..view.height {
            let filerow = y + view.row_offset;
            match frame.document.row(filerow) {
                Some(row) => self.draw_text(row, view),
                None if frame.document.is_empty() && y == view.height / 3 => {
                    self.draw_welcome(view.width)
                },
                None => self.push(b"~"),
            }
            self.push(b"\x1b[K\r\n");
        }
    }

    fn draw_welcome(&mut self, width: usize) {
        let welcome = format!("Mochi editor -- version {}", env!("CARGO_PKG_VERSION"));
        let shown = &welcome.as_bytes()[..welcome.len().min(width)];
        let mut padding = (width - shown.len()) / 2;
        if padding > 0 {
            self.push(b"~");
            padding -= 1;
        }
        self.buf.extend(std::iter::repeat(b' ').take(padding));
        self.push(shown);
    }

    fn draw_text(&mut self, row: &Row, view: &Viewport) {
        let render = row.render();
        let start = view.col_offset.min(render.len());
        let end = (view.col_offset + view.width).min(render.len());

        let mut current: Option<u8> = None;
        for (&c, &hl) in render[start..end].iter().zip(&row.highlight()[start..end]) {
            if c.is_ascii_control() {
                let symbol = if c <= 26 { b'@' + c } else { b'?' };
                self.push(b"\x1b[7m");
                self.buf.push(symbol);
                self.push(b"\x1b[m");
                if let Some(color) = current {
                    self.push_fmt(format_args!("\x1b[{color}m"));
                }
            } else if hl == Highlight::Normal {
                if current.take().is_some() {
                    self.push(b"\x1b[39m");
                }
                self.buf.push(c);
            } else {
                let color = hl.color();
                if current != Some(color) {
                    current = Some(color);
                    self.push_fmt(format_args!("\x1b[{color}m"));
                }
                self.buf.push(c);
            }
        }
        self.push(b"\x1b[39m");
    }

    fn draw_status_bar(&mut self, frame: &Frame<'_>) {
        let document = frame.document;
        let width = frame.viewport.width;

        let name = document
            .filename()
            .map_or(NO_NAME.as_bytes(), |p| p.as_os_str().as_bytes());
        let mut left = name[..name.len().min(STATUS_NAME_MAX)].to_vec();
        left.extend_from_slice(
            format!(
                " - {} lines{}",
                document.len(),
                if document.is_dirty() { " (modified)" } else { "" },
            )
            .as_bytes(),
        );
        let right = format!(
            "{} | {}/{}",
            document.filetype().unwrap_or(NO_FILETYPE),
            frame.cursor.row + 1,
            document.len()
        );

        self.push(b"\x1b[7m");
        let left = &left[..left.len().min(width)];
        self.push(left);
        let mut len = left.len();
        while len < width {
            if width - len == right.len() {
                self.push(right.as_bytes());
                break;
            }
            self.buf.push(b' ');
            len += 1;
        }
        self.push(b"\x1b[m\r\n");
    }

    fn draw_message_bar(&mut self, frame: &Frame<'_>) {
        self.push(b"\x1b[K");
        if let Some(message) = frame.message {
            let bytes = message.as_bytes();
            self.push(&bytes[..bytes.len().min(frame.viewport.width)]);
        }
    }
}
