//! Cursor state management
//!
//! The cursor lives in buffer space: a row index and a logical column. The
//! render column is always derived from the current row on demand. The
//! cursor may rest on the virtual row one past the last row, where typing
//! appends a new row.

use super::document::Document;

/// Buffer-space cursor position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Row index (0-indexed, up to and including the row count)
    pub row: usize,
    /// Logical column within the row
    pub col: usize,
}

impl Cursor {
    /// Create a cursor at the given position
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Render column of the cursor in `document`
    pub fn render_col(&self, document: &Document) -> usize {
        document.row(self.row).map_or(0, |row| row.cx_to_rx(self.col))
    }

    /// Move one column left, wrapping to the end of the previous row
    pub fn move_left(&mut self, document: &Document) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = document.row_len(self.row);
        }
    }

    /// Move one column right, wrapping to the start of the next row
    pub fn move_right(&mut self, document: &Document) {
        if let Some(row) = document.row(self.row) {
            if self.col < row.len() {
                self.col += 1;
            } else {
                self.row += 1;
                self.col = 0;
            }
        }
    }

    /// Move one row up
    pub fn move_up(&mut self, document: &Document) {
        self.row = self.row.saturating_sub(1);
        self.snap_to_row(document);
    }

    /// Move one row down, stopping on the virtual row past the end
    pub fn move_down(&mut self, document: &Document) {
        if self.row < document.len() {
            self.row += 1;
        }
        self.snap_to_row(document);
    }

    /// Move to the start of the row
    pub fn home(&mut self) {
        self.col = 0;
    }

    /// Move to the end of the row
    pub fn end(&mut self, document: &Document) {
        self.col = document.row_len(self.row);
    }

    /// Clamp the column to the current row's length
    pub fn snap_to_row(&mut self, document: &Document) {
        self.col = self.col.min(document.row_len(self.row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::from_lines(["hello", "", "a\tb"])
    }

    #[test]
    fn test_render_col() {
        let doc = doc();
        assert_eq!(Cursor::new(2, 2).render_col(&doc), 4);
        assert_eq!(Cursor::new(0, 3).render_col(&doc), 3);
        assert_eq!(Cursor::new(3, 0).render_col(&doc), 0);
    }

    #[test]
    fn test_left_wraps_to_previous_row_end() {
        let doc = doc();
        let mut cursor = Cursor::new(1, 0);
        cursor.move_left(&doc);
        assert_eq!(cursor, Cursor::new(0, 5));

        let mut origin = Cursor::new(0, 0);
        origin.move_left(&doc);
        assert_eq!(origin, Cursor::new(0, 0));
    }

    #[test]
    fn test_right_wraps_to_next_row_start() {
        let doc = doc();
        let mut cursor = Cursor::new(0, 5);
        cursor.move_right(&doc);
        assert_eq!(cursor, Cursor::new(1, 0));

        let mut past_end = Cursor::new(3, 0);
        past_end.move_right(&doc);
        assert_eq!(past_end, Cursor::new(3, 0));
    }

    #[test]
    fn test_vertical_moves_snap_column() {
        let doc = doc();
        let mut cursor = Cursor::new(0, 4);
        cursor.move_down(&doc);
        assert_eq!(cursor, Cursor::new(1, 0));
        cursor.move_down(&doc);
        cursor.move_down(&doc);
        assert_eq!(cursor, Cursor::new(3, 0));
        cursor.move_down(&doc);
        assert_eq!(cursor.row, 3);
        cursor.move_up(&doc);
        cursor.end(&doc);
        assert_eq!(cursor, Cursor::new(2, 3));
        cursor.home();
        assert_eq!(cursor.col, 0);
    }
}
