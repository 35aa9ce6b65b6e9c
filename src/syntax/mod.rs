//! Syntax highlighting
//!
//! A filetype is described by an immutable [`SyntaxDefinition`]. The set of
//! known filetypes lives in a [`SyntaxRegistry`] that is built once at
//! startup and consulted whenever a filename becomes known.

mod highlighter;

pub use highlighter::{highlight_row, is_separator};

use serde::{Deserialize, Serialize};

/// Highlight class of one rendered column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Highlight {
    #[default]
    Normal,
    Comment,
    KeywordPrimary,
    KeywordSecondary,
    String,
    Number,
    /// Temporary overlay for the current search match
    Match,
}

impl Highlight {
    /// ANSI foreground color code (SGR parameter) for this class
    pub fn color(self) -> u8 {
        match self {
            Highlight::Comment => 36,
            Highlight::KeywordPrimary => 33,
            Highlight::KeywordSecondary => 32,
            Highlight::String => 35,
            Highlight::Number => 31,
            Highlight::Match => 34,
            Highlight::Normal => 37,
        }
    }
}

/// Which keyword class a keyword belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    Primary,
    Secondary,
}

/// A keyword of a filetype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub text: String,
    pub kind: KeywordKind,
}

impl Keyword {
    /// Marker suffix that designates a secondary keyword (`"int|"`)
    pub const SECONDARY_MARKER: char = '|';

    /// Parse a keyword in the marker convention
    pub fn parse(spec: &str) -> Self {
        match spec.strip_suffix(Self::SECONDARY_MARKER) {
            Some(text) => Self {
                text: text.to_string(),
                kind: KeywordKind::Secondary,
            },
            None => Self {
                text: spec.to_string(),
                kind: KeywordKind::Primary,
            },
        }
    }

    /// Highlight class for this keyword
    pub fn highlight(&self) -> Highlight {
        match self.kind {
            KeywordKind::Primary => Highlight::KeywordPrimary,
            KeywordKind::Secondary => Highlight::KeywordSecondary,
        }
    }
}

/// Highlighting rules for one filetype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDefinition {
    /// Name shown in the status bar
    pub filetype: String,
    /// Patterns starting with `.` match the extension, others match a substring
    pub file_match: Vec<String>,
    /// Keywords, tried in order
    pub keywords: Vec<Keyword>,
    /// Single-line comment marker
    pub comment: Option<String>,
    pub highlight_numbers: bool,
    pub highlight_strings: bool,
}

impl SyntaxDefinition {
    /// Create a definition with no rules
    pub fn new(filetype: &str) -> Self {
        Self {
            filetype: filetype.to_string(),
            file_match: Vec::new(),
            keywords: Vec::new(),
            comment: None,
            highlight_numbers: false,
            highlight_strings: false,
        }
    }

    /// Set the filename patterns
    pub fn with_file_match(mut self, patterns: &[&str]) -> Self {
        self.file_match = patterns.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Set the keywords, `|`-suffixed entries being secondary
    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| Keyword::parse(k)).collect();
        self
    }

    /// Set the single-line comment marker
    pub fn with_comment(mut self, marker: &str) -> Self {
        self.comment = (!marker.is_empty()).then(|| marker.to_string());
        self
    }

    /// Enable number and string highlighting
    pub fn with_flags(mut self, numbers: bool, strings: bool) -> Self {
        self.highlight_numbers = numbers;
        self.highlight_strings = strings;
        self
    }

    /// Check whether a filename is handled by this definition
    pub fn matches(&self, filename: &str) -> bool {
        let extension = filename.rfind('.').map(|i| &filename[i..]);
        self.file_match.iter().any(|pattern| {
            if pattern.starts_with('.') {
                extension == Some(pattern.as_str())
            } else {
                filename.contains(pattern.as_str())
            }
        })
    }
}

/// Registered syntax definitions, searched in registration order
#[derive(Debug, Clone, Default)]
pub struct SyntaxRegistry {
    definitions: Vec<SyntaxDefinition>,
}

impl SyntaxRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition after the existing ones
    pub fn register(&mut self, definition: SyntaxDefinition) -> &mut Self {
        self.definitions.push(definition);
        self
    }

    /// Registry with the built-in filetypes
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(c_syntax())
            .register(rust_syntax())
            .register(python_syntax());
        registry
    }

    /// First definition whose patterns match `filename`
    pub fn select(&self, filename: &str) -> Option<&SyntaxDefinition> {
        self.definitions.iter().find(|def| def.matches(filename))
    }
}

fn c_syntax() -> SyntaxDefinition {
    SyntaxDefinition::new("c")
        .with_file_match(&[".c", ".h", ".cpp"])
        .with_keywords(&[
            "switch", "if", "while", "for", "break", "continue", "return", "else", "struct",
            "union", "typedef", "static", "enum", "class", "case", "int|", "long|", "double|",
            "float|", "char|", "unsigned|", "signed|", "void|",
        ])
        .with_comment("//")
        .with_flags(true, true)
}

fn rust_syntax() -> SyntaxDefinition {
    SyntaxDefinition::new("rust")
        .with_file_match(&[".rs"])
        .with_keywords(&[
            "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn",
            "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
            "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
            "unsafe", "use", "where", "while", "bool|", "char|", "str|", "String|", "u8|",
            "u16|", "u32|", "u64|", "usize|", "i8|", "i16|", "i32|", "i64|", "isize|", "f32|",
            "f64|",
        ])
        .with_comment("//")
        .with_flags(true, true)
}

fn python_syntax() -> SyntaxDefinition {
    SyntaxDefinition::new("python")
        .with_file_match(&[".py"])
        .with_keywords(&[
            "and", "as", "break", "class", "continue", "def", "elif", "else", "except",
            "finally", "for", "from", "if", "import", "in", "is", "lambda", "not", "or", "pass",
            "raise", "return", "try", "while", "with", "yield", "None|", "True|", "False|",
            "int|", "str|", "float|", "list|", "dict|",
        ])
        .with_comment("#")
        .with_flags(true, true)
}
