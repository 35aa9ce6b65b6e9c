//! Incremental search
//!
//! Called once per keystroke while the search prompt is open. Each step
//! first removes the previous match overlay, then looks for the query
//! cyclically starting one row past the last match, in the current
//! direction. Only the first match found is painted.

use crate::core::{Cursor, Document};
use crate::input::Key;
use crate::syntax::Highlight;

/// Search direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Highlight classes of a row saved before painting a match over it
#[derive(Debug, Clone, PartialEq, Eq)]
struct SavedHighlight {
    row: usize,
    hl: Vec<Highlight>,
}

/// State kept between search steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Row of the last match
    pub last_match: Option<usize>,
    pub direction: Direction,
    saved: Option<SavedHighlight>,
}

impl SearchState {
    /// Create an idle search state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a row currently carries the match overlay
    pub fn has_overlay(&self) -> bool {
        self.saved.is_some()
    }

    /// Put back the highlight classes of the overlaid row, if any
    pub fn restore(&mut self, document: &mut Document) {
        if let Some(saved) = self.saved.take() {
            if let Some(row) = document.row_mut(saved.row) {
                row.restore_highlight(saved.hl);
            }
        }
    }

    /// Forget the last match and go back to searching forward
    pub fn reset(&mut self) {
        self.last_match = None;
        self.direction = Direction::Forward;
    }

    /// Run one incremental step for `query` after `key` was pressed
    ///
    /// Returns the cursor position of the match, if one was found.
    pub fn step(&mut self, document: &mut Document, query: &[u8], key: Key) -> Option<Cursor> {
        self.restore(document);

        match key {
            Key::ENTER | Key::ESCAPE => {
                self.reset();
                return None;
            },
            Key::ArrowRight | Key::ArrowDown => self.direction = Direction::Forward,
            Key::ArrowLeft | Key::ArrowUp => self.direction = Direction::Backward,
            _ => self.reset(),
        }

        if self.last_match.is_none() {
            self.direction = Direction::Forward;
        }

        let (found, start) = self.find(document, query)?;
        self.last_match = Some(found.row);

        let row = document.row_mut(found.row)?;
        self.saved = Some(SavedHighlight {
            row: found.row,
            hl: row.highlight().to_vec(),
        });
        row.paint(start..start + query.len(), Highlight::Match);

        Some(found)
    }

    /// Scan every row once, starting past the last match
    ///
    /// Returns the cursor position of the match and its render offset.
    fn find(&self, document: &Document, query: &[u8]) -> Option<(Cursor, usize)> {
        let len = document.len();
        if len == 0 {
            return None;
        }

        let mut current = self.last_match;
        for _ in 0..len {
            let next = match (current, self.direction) {
                (None, Direction::Forward) => 0,
                (None, Direction::Backward) => len - 1,
                (Some(row), Direction::Forward) => (row + 1) % len,
                (Some(row), Direction::Backward) => row.checked_sub(1).unwrap_or(len - 1),
            };
            current = Some(next);

            let row = document.row(next)?;
            if let Some(rx) = find_bytes(row.render(), query) {
                return Some((Cursor::new(next, row.rx_to_cx(rx)), rx));
            }
        }
        None
    }
}

/// Byte offset of the first occurrence of `needle` in `haystack`
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
