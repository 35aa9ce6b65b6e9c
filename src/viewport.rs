//! Viewport scrolling
//!
//! Maps buffer coordinates to screen coordinates. After [`Viewport::scroll`]
//! the cursor's render position always lies inside the visible window.

/// The visible window over the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row
    pub row_offset: usize,
    /// First visible render column
    pub col_offset: usize,
    /// Text rows on screen
    pub height: usize,
    /// Columns on screen
    pub width: usize,
}

impl Viewport {
    /// Create a viewport scrolled to the top-left corner
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            height,
            width,
        }
    }

    /// Adjust the offsets so that (`row`, `render_col`) is visible
    pub fn scroll(&mut self, row: usize, render_col: usize) {
        if row < self.row_offset {
            self.row_offset = row;
        }
        if row >= self.row_offset + self.height {
            self.row_offset = (row + 1).saturating_sub(self.height);
        }
        if render_col < self.col_offset {
            self.col_offset = render_col;
        }
        if render_col >= self.col_offset + self.width {
            self.col_offset = (render_col + 1).saturating_sub(self.width);
        }
    }

    /// Screen position (0-indexed) of a buffer position inside the window
    pub fn screen_position(&self, row: usize, render_col: usize) -> (usize, usize) {
        (
            row.saturating_sub(self.row_offset),
            render_col.saturating_sub(self.col_offset),
        )
    }

    /// Check whether a buffer position is inside the window
    pub fn contains(&self, row: usize, render_col: usize) -> bool {
        (self.row_offset..self.row_offset + self.height).contains(&row)
            && (self.col_offset..self.col_offset + self.width).contains(&render_col)
    }
}
