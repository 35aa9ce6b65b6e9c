//! Buffer row representation
//!
//! A row owns its raw bytes plus two derived projections: the tab-expanded
//! render string and one highlight class per rendered column. Every
//! mutation goes through a method that recomputes both before returning,
//! so the projections are never stale.

use std::ops::Range;

use crate::syntax::{highlight_row, Highlight, SyntaxDefinition};

/// Tab stop width in render columns
pub const TAB_STOP: usize = 4;

/// One line of the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Raw content, without line terminator
    chars: Vec<u8>,
    /// Tab-expanded content as shown on screen
    render: Vec<u8>,
    /// Highlight class for each byte of `render`
    hl: Vec<Highlight>,
}

impl Row {
    /// Create a row from raw content
    pub fn new(chars: impl Into<Vec<u8>>, syntax: Option<&SyntaxDefinition>) -> Self {
        let mut row = Self {
            chars: chars.into(),
            ..Self::default()
        };
        row.update(syntax);
        row
    }

    /// Raw content
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Rendered content
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Highlight classes, one per rendered column
    pub fn highlight(&self) -> &[Highlight] {
        &self.hl
    }

    /// Length in logical columns
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Check if the row has no content
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Length in render columns
    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    /// Convert a logical column to a render column
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        self.chars.iter().take(cx).fold(0, |rx, &c| {
            if c == b'\t' {
                rx + TAB_STOP - rx % TAB_STOP
            } else {
                rx + 1
            }
        })
    }

    /// Convert a render column back to a logical column
    ///
    /// A render column inside a tab expansion maps to the tab itself.
    /// Columns past the end map to the row length.
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &c) in self.chars.iter().enumerate() {
            if c == b'\t' {
                cur_rx += (TAB_STOP - 1) - (cur_rx % TAB_STOP);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    /// Recompute the render string and highlight classes
    pub(crate) fn update(&mut self, syntax: Option<&SyntaxDefinition>) {
        self.render = expand_tabs(&self.chars);
        self.hl = highlight_row(&self.render, syntax);
    }

    /// Insert a byte, clamping `at` to the end of the row
    pub(crate) fn insert(&mut self, at: usize, c: u8, syntax: Option<&SyntaxDefinition>) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, c);
        self.update(syntax);
    }

    /// Remove the byte at `at`, returning false if out of range
    pub(crate) fn remove(&mut self, at: usize, syntax: Option<&SyntaxDefinition>) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        self.update(syntax);
        true
    }

    /// Append bytes to the end of the row
    pub(crate) fn append(&mut self, suffix: &[u8], syntax: Option<&SyntaxDefinition>) {
        self.chars.extend_from_slice(suffix);
        self.update(syntax);
    }

    /// Cut the row at `at` (clamped), returning the tail
    pub(crate) fn split_off(&mut self, at: usize, syntax: Option<&SyntaxDefinition>) -> Vec<u8> {
        let at = at.min(self.chars.len());
        let tail = self.chars.split_off(at);
        self.update(syntax);
        tail
    }

    /// Paint `range` of the render columns with `hl`, clamped to the row
    pub(crate) fn paint(&mut self, range: Range<usize>, hl: Highlight) {
        let end = range.end.min(self.hl.len());
        let start = range.start.min(end);
        self.hl[start..end].fill(hl);
    }

    /// Replace the highlight classes with a previously saved copy
    pub(crate) fn restore_highlight(&mut self, saved: Vec<Highlight>) {
        if saved.len() == self.render.len() {
            self.hl = saved;
        }
    }
}

/// Expand tabs to spaces up to the next multiple of [`TAB_STOP`]
pub fn expand_tabs(chars: &[u8]) -> Vec<u8> {
    let tabs = chars.iter().filter(|&&c| c == b'\t').count();
    let mut render = Vec::with_capacity(chars.len() + tabs * (TAB_STOP - 1));
    for &c in chars {
        if c == b'\t' {
            render.push(b' ');
            while render.len() % TAB_STOP != 0 {
                render.push(b' ');
            }
        } else {
            render.push(c);
        }
    }
    render
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_row_new() {
        let row = Row::new("abc", None);
        assert_eq!(row.chars(), b"abc");
        assert_eq!(row.render(), b"abc");
        assert_eq!(row.highlight().len(), 3);
        assert_eq!(row.len(), 3);
        assert!(!row.is_empty());
    }

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs(b"\tx"), b"    x");
        assert_eq!(expand_tabs(b"ab\tx"), b"ab  x");
        assert_eq!(expand_tabs(b"abcd\tx"), b"abcd    x");
        assert_eq!(expand_tabs(b"\t\t"), b"        ");
        assert_eq!(expand_tabs(b""), b"");
    }

    #[test]
    fn test_cx_to_rx() {
        let row = Row::new("a\tb\tc", None);
        assert_eq!(row.cx_to_rx(0), 0);
        assert_eq!(row.cx_to_rx(1), 1);
        assert_eq!(row.cx_to_rx(2), 4);
        assert_eq!(row.cx_to_rx(3), 5);
        assert_eq!(row.cx_to_rx(4), 8);
        assert_eq!(row.cx_to_rx(5), 9);
    }

    #[test]
    fn test_rx_inside_tab_maps_to_tab() {
        let row = Row::new("a\tb", None);
        assert_eq!(row.rx_to_cx(1), 1);
        assert_eq!(row.rx_to_cx(2), 1);
        assert_eq!(row.rx_to_cx(3), 1);
        assert_eq!(row.rx_to_cx(4), 2);
        assert_eq!(row.rx_to_cx(100), 3);
    }

    #[test]
    fn test_insert_clamps() {
        let mut row = Row::new("ab", None);
        row.insert(99, b'c', None);
        assert_eq!(row.chars(), b"abc");
        row.insert(0, b'\t', None);
        assert_eq!(row.render(), b"    abc");
        assert_eq!(row.highlight().len(), 7);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut row = Row::new("ab", None);
        assert!(!row.remove(2, None));
        assert!(row.remove(0, None));
        assert_eq!(row.chars(), b"b");
    }

    #[test]
    fn test_split_off() {
        let mut row = Row::new("hello", None);
        let tail = row.split_off(2, None);
        assert_eq!(row.chars(), b"he");
        assert_eq!(row.render(), b"he");
        assert_eq!(tail, b"llo");
    }

    #[test]
    fn test_paint_and_restore() {
        let mut row = Row::new("abcdef", None);
        let saved = row.highlight().to_vec();
        row.paint(2..4, Highlight::Match);
        assert_eq!(row.highlight()[2], Highlight::Match);
        assert_eq!(row.highlight()[4], Highlight::Normal);
        row.paint(5..99, Highlight::Match);
        assert_eq!(row.highlight()[5], Highlight::Match);
        row.restore_highlight(saved.clone());
        assert_eq!(row.highlight(), &saved[..]);
    }

    proptest! {
        #[test]
        fn prop_render_len_matches_cx_to_rx(chars in proptest::collection::vec(
            prop_oneof![Just(b'\t'), b'a'..=b'z'], 0..40)) {
            let row = Row::new(chars.clone(), None);
            prop_assert_eq!(row.render_len(), row.cx_to_rx(chars.len()));
            prop_assert_eq!(row.highlight().len(), row.render_len());
        }

        #[test]
        fn prop_rx_to_cx_inverts_cx_to_rx(chars in proptest::collection::vec(
            prop_oneof![Just(b'\t'), b' '..=b'~'], 0..40)) {
            let row = Row::new(chars.clone(), None);
            for cx in 0..=chars.len() {
                prop_assert_eq!(row.rx_to_cx(row.cx_to_rx(cx)), cx);
            }
        }

        #[test]
        fn prop_rx_inside_tab_yields_tab(chars in proptest::collection::vec(
            prop_oneof![Just(b'\t'), b'a'..=b'z'], 1..40)) {
            let row = Row::new(chars.clone(), None);
            for (cx, &c) in chars.iter().enumerate() {
                if c != b'\t' {
                    continue;
                }
                let start = row.cx_to_rx(cx);
                let end = row.cx_to_rx(cx + 1);
                prop_assert_eq!(end % TAB_STOP, 0);
                prop_assert_eq!(end - start, TAB_STOP - start % TAB_STOP);
                for rx in start..end {
                    prop_assert_eq!(row.rx_to_cx(rx), cx);
                }
            }
        }
    }
}
