//! Editor controller
//!
//! Owns the document, the cursor, the viewport and the search state, and
//! turns decoded keys into mutations. The loop is strictly sequential: read
//! one key, handle it to completion, scroll, render, repeat.

use std::io::{self, Write};
use std::path::Path;

use crate::app::Config;
use crate::core::{Cursor, Document, DocumentError};
use crate::input::{ByteSource, Key, KeyDecoder};
use crate::renderer::{Frame, Renderer, StatusMessage};
use crate::search::SearchState;
use crate::syntax::SyntaxRegistry;
use crate::term::{TermError, WindowSize};
use crate::viewport::Viewport;

/// Shown once at startup
pub const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

const QUIT: Key = Key::ctrl(b'q');
const SAVE: Key = Key::ctrl(b's');
const FIND: Key = Key::ctrl(b'f');
const CTRL_H: Key = Key::ctrl(b'h');
const REDRAW: Key = Key::ctrl(b'l');

/// Rows taken by the status and message bars
const BAR_ROWS: u16 = 2;

/// Error type for the editor loop
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Terminal error: {0}")]
    Term(#[from] TermError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

/// What the loop should do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The editor session
pub struct Editor<S, W> {
    config: Config,
    registry: SyntaxRegistry,
    document: Document,
    cursor: Cursor,
    viewport: Viewport,
    search: SearchState,
    message: Option<StatusMessage>,
    /// Ctrl-Q presses still needed to leave a dirty document
    quit_remaining: u32,
    renderer: Renderer,
    decoder: KeyDecoder,
    input: S,
    output: W,
}

impl<S: ByteSource, W: Write> Editor<S, W> {
    /// Create an editor over an empty document
    ///
    /// Two rows of `size` are reserved for the status and message bars.
    pub fn new(
        config: Config,
        registry: SyntaxRegistry,
        size: WindowSize,
        input: S,
        output: W,
    ) -> Self {
        let viewport = Viewport::new(
            size.rows.saturating_sub(BAR_ROWS) as usize,
            size.cols as usize,
        );
        Self {
            quit_remaining: config.quit_times,
            config,
            registry,
            document: Document::new(),
            cursor: Cursor::default(),
            viewport,
            search: SearchState::new(),
            message: None,
            renderer: Renderer::new(),
            decoder: KeyDecoder::new(),
            input,
            output,
        }
    }

    /// Replace the document with the contents of `path`
    pub fn open(&mut self, path: &Path) -> EditorResult<()> {
        self.document = Document::open(path, &self.registry)?;
        self.cursor = Cursor::default();
        self.viewport.row_offset = 0;
        self.viewport.col_offset = 0;
        Ok(())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Everything written to the terminal so far
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Text of the current status message, regardless of its age
    pub fn status_message(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    pub fn set_status_message(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage::new(text));
    }

    /// Scroll the cursor into view and draw one frame with a single write
    pub fn refresh_screen(&mut self) -> EditorResult<()> {
        let render_col = self.cursor.render_col(&self.document);
        self.viewport.scroll(self.cursor.row, render_col);

        let timeout = self.config.message_timeout();
        let frame = Frame {
            document: &self.document,
            viewport: &self.viewport,
            cursor: self.cursor,
            message: self
                .message
                .as_ref()
                .filter(|m| m.visible(timeout))
                .map(|m| m.text.as_str()),
        };
        let bytes = self.renderer.compose(&frame);
        self.output.write_all(bytes)?;
        self.output.flush()?;
        Ok(())
    }

    /// Draw, read and handle keys until the user quits
    pub fn run(&mut self) -> EditorResult<()> {
        loop {
            self.refresh_screen()?;
            if self.process_keypress()? == Flow::Quit {
                tracing::info!("quit");
                return Ok(());
            }
        }
    }

    /// Read one key and handle it
    pub fn process_keypress(&mut self) -> EditorResult<Flow> {
        let key = self.read_key()?;
        self.handle_key(key)
    }

    fn read_key(&mut self) -> EditorResult<Key> {
        Ok(self.decoder.read_key(&mut self.input)?)
    }

    /// Dispatch a decoded key
    pub fn handle_key(&mut self, key: Key) -> EditorResult<Flow> {
        match key {
            Key::ENTER => self.insert_newline(),
            QUIT => {
                if self.document.is_dirty() && self.quit_remaining > 1 {
                    self.quit_remaining -= 1;
                    self.set_status_message(format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_remaining
                    ));
                    return Ok(Flow::Continue);
                }
                self.output.write_all(b"\x1b[2J\x1b[H")?;
                self.output.flush()?;
                return Ok(Flow::Quit);
            },
            SAVE => self.save()?,
            FIND => self.find()?,
            Key::Home => self.cursor.home(),
            Key::End => self.cursor.end(&self.document),
            Key::Backspace | CTRL_H => self.del_char(),
            Key::Delete => {
                self.cursor.move_right(&self.document);
                self.del_char();
            },
            Key::PageUp | Key::PageDown => self.page(key),
            Key::ArrowUp => self.cursor.move_up(&self.document),
            Key::ArrowDown => self.cursor.move_down(&self.document),
            Key::ArrowLeft => self.cursor.move_left(&self.document),
            Key::ArrowRight => self.cursor.move_right(&self.document),
            REDRAW | Key::ESCAPE => {},
            Key::Char(c) => self.insert_char(c),
        }

        self.quit_remaining = self.config.quit_times;
        Ok(Flow::Continue)
    }

    fn page(&mut self, key: Key) {
        let height = self.viewport.height;
        if key == Key::PageUp {
            self.cursor.row = self.viewport.row_offset;
        } else {
            self.cursor.row = (self.viewport.row_offset + height)
                .saturating_sub(1)
                .min(self.document.len());
        }
        for _ in 0..height {
            if key == Key::PageUp {
                self.cursor.move_up(&self.document);
            } else {
                self.cursor.move_down(&self.document);
            }
        }
    }

    /// Insert a byte at the cursor, appending a row on the virtual last row
    fn insert_char(&mut self, c: u8) {
        if self.cursor.row == self.document.len() {
            self.document.insert_row(self.cursor.row, "");
        }
        self.document.insert_char(self.cursor.row, self.cursor.col, c);
        self.cursor.col += 1;
    }

    fn insert_newline(&mut self) {
        if self.cursor.col == 0 {
            self.document.insert_row(self.cursor.row, "");
        } else {
            self.document.split_row(self.cursor.row, self.cursor.col);
        }
        self.cursor.row += 1;
        self.cursor.col = 0;
    }

    /// Delete the byte left of the cursor, joining rows at column 0
    fn del_char(&mut self) {
        if self.cursor.row >= self.document.len() {
            return;
        }
        if self.cursor.col > 0 {
            self.document.delete_char(self.cursor.row, self.cursor.col - 1);
            self.cursor.col -= 1;
        } else if let Some(joined_at) = self.document.join_row_into_previous(self.cursor.row) {
            self.cursor.row -= 1;
            self.cursor.col = joined_at;
        }
    }

    fn save(&mut self) -> EditorResult<()> {
        if self.document.filename().is_none() {
            let Some(name) = self.prompt("Save as: {} (ESC to cancel)", |_, _, _| {})? else {
                self.set_status_message("Save aborted");
                return Ok(());
            };
            let name = String::from_utf8_lossy(&name).into_owned();
            self.document.set_filename(name, &self.registry);
        }

        match self.document.save() {
            Ok(written) => self.set_status_message(format!("{written} bytes written to disk")),
            Err(e) => {
                tracing::warn!("Save failed: {}", e);
                self.set_status_message(format!("Can't save! {e}"));
            },
        }
        Ok(())
    }

    fn find(&mut self) -> EditorResult<()> {
        let saved_cursor = self.cursor;
        let saved_offsets = (self.viewport.row_offset, self.viewport.col_offset);

        let query = self.prompt("Search: {} (Use ESC/Arrows/Enter)", |editor, query, key| {
            if let Some(found) = editor.search.step(&mut editor.document, query, key) {
                editor.cursor = found;
                // Past the end, so the next scroll puts the match on the top row
                editor.viewport.row_offset = editor.document.len();
            }
        })?;

        if query.is_none() {
            self.cursor = saved_cursor;
            (self.viewport.row_offset, self.viewport.col_offset) = saved_offsets;
        }
        Ok(())
    }

    /// Read a line of input in the message bar
    ///
    /// `template` has its `{}` replaced by the input typed so far. The
    /// callback runs after every key, including the final Enter or ESC.
    /// Returns `None` when the prompt was cancelled.
    pub fn prompt<F>(&mut self, template: &str, mut callback: F) -> EditorResult<Option<Vec<u8>>>
    where
        F: FnMut(&mut Self, &[u8], Key),
    {
        let mut input = Vec::new();
        loop {
            self.set_status_message(template.replace("{}", &String::from_utf8_lossy(&input)));
            self.refresh_screen()?;

            let key = self.read_key()?;
            match key {
                Key::Delete | Key::Backspace | CTRL_H => {
                    input.pop();
                },
                Key::ESCAPE => {
                    self.set_status_message("");
                    callback(self, &input, key);
                    return Ok(None);
                },
                Key::ENTER if !input.is_empty() => {
                    self.set_status_message("");
                    callback(self, &input, key);
                    return Ok(Some(input));
                },
                Key::Char(c) if c.is_ascii() && !c.is_ascii_control() => input.push(c),
                _ => {},
            }
            callback(self, &input, key);
        }
    }
}
