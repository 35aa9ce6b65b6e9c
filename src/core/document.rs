//! The text buffer
//!
//! A [`Document`] owns the rows, the filename, the selected syntax and a
//! dirty counter. Mutations take row/column coordinates and silently clamp
//! or ignore out-of-range requests.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use super::row::Row;
use crate::syntax::{SyntaxDefinition, SyntaxRegistry};

/// Error type for loading and saving documents
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Save(#[source] io::Error),

    #[error("No filename")]
    NoFilename,
}

/// An open document
#[derive(Debug, Clone, Default)]
pub struct Document {
    rows: Vec<Row>,
    filename: Option<PathBuf>,
    syntax: Option<SyntaxDefinition>,
    /// Content mutations since the last load or save
    dirty: usize,
}

impl Document {
    /// Create an empty, unnamed document
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a file, one row per line
    ///
    /// Trailing `\n` and `\r` bytes are stripped from every line.
    pub fn open(path: &Path, registry: &SyntaxRegistry) -> Result<Self, DocumentError> {
        let file = File::open(path).map_err(|source| DocumentError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut document = Self::new();
        document.filename = Some(path.to_path_buf());
        document.select_syntax(registry);

        let mut reader = BufReader::new(file);
        let mut line = Vec::new();
        loop {
            line.clear();
            let n = reader
                .read_until(b'\n', &mut line)
                .map_err(|source| DocumentError::Open {
                    path: path.to_path_buf(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            while matches!(line.last(), Some(b'\n' | b'\r')) {
                line.pop();
            }
            let row = Row::new(line.as_slice(), document.syntax.as_ref());
            document.rows.push(row);
        }

        tracing::info!(
            path = %path.display(),
            rows = document.rows.len(),
            filetype = document.filetype().unwrap_or("none"),
            "opened file"
        );
        Ok(document)
    }

    /// Build an unnamed document from lines of text
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        Self {
            rows: lines
                .into_iter()
                .map(|line| Row::new(line.as_ref(), None))
                .collect(),
            ..Self::default()
        }
    }

    /// All rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row at `at`, if any
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub(crate) fn row_mut(&mut self, at: usize) -> Option<&mut Row> {
        self.rows.get_mut(at)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the document has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Logical length of row `at`, zero past the end
    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::len)
    }

    /// File path, if the document has one
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Selected syntax definition
    pub fn syntax(&self) -> Option<&SyntaxDefinition> {
        self.syntax.as_ref()
    }

    /// Name of the selected filetype
    pub fn filetype(&self) -> Option<&str> {
        self.syntax.as_ref().map(|s| s.filetype.as_str())
    }

    /// Number of unsaved mutations
    pub fn dirty(&self) -> usize {
        self.dirty
    }

    /// Check for unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Name the document, reselecting syntax and re-highlighting every row
    pub fn set_filename(&mut self, path: impl Into<PathBuf>, registry: &SyntaxRegistry) {
        self.filename = Some(path.into());
        self.select_syntax(registry);
        let syntax = self.syntax.as_ref();
        for row in &mut self.rows {
            row.update(syntax);
        }
    }

    fn select_syntax(&mut self, registry: &SyntaxRegistry) {
        let name = self
            .filename
            .as_deref()
            .map(|p| p.to_string_lossy().into_owned());
        self.syntax = name.and_then(|name| registry.select(&name).cloned());
        tracing::debug!(filetype = self.filetype().unwrap_or("none"), "syntax selected");
    }

    /// Insert a row at `at` (`0..=len`)
    pub fn insert_row(&mut self, at: usize, content: impl AsRef<[u8]>) -> bool {
        if at > self.rows.len() {
            return false;
        }
        let row = Row::new(content.as_ref(), self.syntax.as_ref());
        self.rows.insert(at, row);
        self.dirty += 1;
        true
    }

    /// Delete the row at `at` (`0..len`)
    pub fn delete_row(&mut self, at: usize) -> bool {
        if at >= self.rows.len() {
            return false;
        }
        self.rows.remove(at);
        self.dirty += 1;
        true
    }

    /// Insert a byte, clamping the column to the row end
    pub fn insert_char(&mut self, row: usize, col: usize, c: u8) -> bool {
        let syntax = self.syntax.as_ref();
        let Some(target) = self.rows.get_mut(row) else {
            return false;
        };
        target.insert(col, c, syntax);
        self.dirty += 1;
        true
    }

    /// Delete the byte at (`row`, `col`)
    pub fn delete_char(&mut self, row: usize, col: usize) -> bool {
        let syntax = self.syntax.as_ref();
        let Some(target) = self.rows.get_mut(row) else {
            return false;
        };
        if !target.remove(col, syntax) {
            return false;
        }
        self.dirty += 1;
        true
    }

    /// Append bytes to the end of a row
    pub fn append_string(&mut self, row: usize, suffix: &[u8]) -> bool {
        let syntax = self.syntax.as_ref();
        let Some(target) = self.rows.get_mut(row) else {
            return false;
        };
        target.append(suffix, syntax);
        self.dirty += 1;
        true
    }

    /// Split a row at `col`, moving the tail to a new row below it
    pub fn split_row(&mut self, row: usize, col: usize) -> bool {
        let syntax = self.syntax.as_ref();
        let Some(target) = self.rows.get_mut(row) else {
            return false;
        };
        let tail = target.split_off(col, syntax);
        self.insert_row(row + 1, tail)
    }

    /// Append row `row` to the previous row and remove it
    ///
    /// Returns the column in the previous row where the joined text starts.
    pub fn join_row_into_previous(&mut self, row: usize) -> Option<usize> {
        if row == 0 || row >= self.rows.len() {
            return None;
        }
        let moved = self.rows.remove(row);
        let syntax = self.syntax.as_ref();
        let previous = &mut self.rows[row - 1];
        let join_at = previous.len();
        previous.append(moved.chars(), syntax);
        self.dirty += 1;
        Some(join_at)
    }

    /// Serialize every row followed by a single `\n`
    pub fn to_bytes(&self) -> Vec<u8> {
        let total = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut buf = Vec::with_capacity(total);
        for row in &self.rows {
            buf.extend_from_slice(row.chars());
            buf.push(b'\n');
        }
        buf
    }

    /// Write the document to its file, returning the number of bytes written
    pub fn save(&mut self) -> Result<usize, DocumentError> {
        let path = self.filename.clone().ok_or(DocumentError::NoFilename)?;
        let buf = self.to_bytes();

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .mode(0o644)
            .open(&path)
            .map_err(DocumentError::Save)?;
        file.set_len(buf.len() as u64).map_err(DocumentError::Save)?;
        file.write_all(&buf).map_err(DocumentError::Save)?;

        self.dirty = 0;
        tracing::info!(path = %path.display(), bytes = buf.len(), "saved file");
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Highlight;

    fn lines(document: &Document) -> Vec<String> {
        document
            .rows()
            .iter()
            .map(|r| String::from_utf8_lossy(r.chars()).into_owned())
            .collect()
    }

    #[test]
    fn test_insert_and_delete_rows() {
        let mut doc = Document::new();
        assert!(doc.insert_row(0, "b"));
        assert!(doc.insert_row(0, "a"));
        assert!(doc.insert_row(2, "c"));
        assert!(!doc.insert_row(5, "x"));
        assert_eq!(lines(&doc), ["a", "b", "c"]);
        assert_eq!(doc.dirty(), 3);

        assert!(doc.delete_row(1));
        assert!(!doc.delete_row(2));
        assert_eq!(lines(&doc), ["a", "c"]);
        assert_eq!(doc.dirty(), 4);
    }

    #[test]
    fn test_char_mutations() {
        let mut doc = Document::from_lines(["ac"]);
        assert!(!doc.is_dirty());
        assert!(doc.insert_char(0, 1, b'b'));
        assert!(doc.insert_char(0, 100, b'd'));
        assert!(!doc.insert_char(1, 0, b'x'));
        assert_eq!(lines(&doc), ["abcd"]);

        assert!(doc.delete_char(0, 0));
        assert!(!doc.delete_char(0, 3));
        assert!(!doc.delete_char(4, 0));
        assert_eq!(lines(&doc), ["bcd"]);
        assert_eq!(doc.dirty(), 3);
    }

    #[test]
    fn test_split_and_join() {
        let mut doc = Document::from_lines(["hello", "world"]);
        assert!(doc.split_row(0, 2));
        assert_eq!(lines(&doc), ["he", "llo", "world"]);

        assert_eq!(doc.join_row_into_previous(1), Some(2));
        assert_eq!(lines(&doc), ["hello", "world"]);
        assert_eq!(doc.join_row_into_previous(0), None);
        assert_eq!(doc.join_row_into_previous(2), None);
        assert!(doc.append_string(1, b"!"));
        assert_eq!(lines(&doc), ["hello", "world!"]);
    }

    #[test]
    fn test_split_at_row_end() {
        let mut doc = Document::from_lines(["abc"]);
        assert!(doc.split_row(0, 3));
        assert_eq!(lines(&doc), ["abc", ""]);
        assert!(!doc.split_row(5, 0));
    }

    #[test]
    fn test_to_bytes() {
        let doc = Document::from_lines(["abc", "", "d"]);
        assert_eq!(doc.to_bytes(), b"abc\n\nd\n");
    }

    #[test]
    fn test_save_then_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.txt");
        let registry = SyntaxRegistry::builtin();

        let mut doc = Document::from_lines(["abc", "", "d"]);
        doc.insert_char(2, 1, b'e');
        assert!(doc.is_dirty());
        doc.set_filename(&path, &registry);
        assert_eq!(doc.save().unwrap(), 8);
        assert!(!doc.is_dirty());

        let loaded = Document::open(&path, &registry).unwrap();
        assert_eq!(lines(&loaded), ["abc", "", "de"]);
        assert_eq!(loaded.dirty(), 0);
    }

    #[test]
    fn test_open_strips_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dos.txt");
        std::fs::write(&path, b"one\r\ntwo\r\nthree").unwrap();

        let mut doc = Document::open(&path, &SyntaxRegistry::builtin()).unwrap();
        assert_eq!(lines(&doc), ["one", "two", "three"]);

        doc.save().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"one\ntwo\nthree\n");
    }

    #[test]
    fn test_save_truncates_longer_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shrink.txt");
        std::fs::write(&path, b"a much longer original body\n").unwrap();

        let mut doc = Document::open(&path, &SyntaxRegistry::builtin()).unwrap();
        doc.delete_row(0);
        doc.insert_row(0, "x");
        doc.save().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"x\n");
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.c");
        let err = Document::open(&path, &SyntaxRegistry::builtin()).unwrap_err();
        assert!(matches!(err, DocumentError::Open { .. }));
    }

    #[test]
    fn test_save_without_filename() {
        let mut doc = Document::from_lines(["x"]);
        assert!(matches!(doc.save(), Err(DocumentError::NoFilename)));
    }

    #[test]
    fn test_save_failure_keeps_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::from_lines(["x"]);
        doc.insert_char(0, 0, b'y');
        // A directory cannot be opened for writing
        doc.set_filename(dir.path(), &SyntaxRegistry::builtin());
        assert!(matches!(doc.save(), Err(DocumentError::Save(_))));
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_open_c_file_highlights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.c");
        std::fs::write(&path, b"int x;\n").unwrap();

        let doc = Document::open(&path, &SyntaxRegistry::builtin()).unwrap();
        assert_eq!(doc.filetype(), Some("c"));
        let hl = doc.row(0).unwrap().highlight();
        assert_eq!(&hl[..3], &[Highlight::KeywordSecondary; 3]);
        assert!(hl[3..].iter().all(|&h| h == Highlight::Normal));
    }

    #[test]
    fn test_set_filename_rehighlights() {
        let mut doc = Document::from_lines(["return 0;"]);
        assert_eq!(doc.row(0).unwrap().highlight()[0], Highlight::Normal);
        doc.set_filename("prog.c", &SyntaxRegistry::builtin());
        assert_eq!(doc.row(0).unwrap().highlight()[0], Highlight::KeywordPrimary);
        assert_eq!(doc.row(0).unwrap().highlight()[7], Highlight::Number);
    }
}
