//! Single-line highlighter
//!
//! One forward pass over a row's rendered bytes. The only state carried
//! between columns is whether the previous byte was a separator and which
//! quote opened the current string, and neither survives past the end of
//! the row.

use super::{Highlight, SyntaxDefinition};

/// Punctuation that ends a word, in addition to whitespace and NUL
const SEPARATORS: &[u8] = b",.()+-/*=~%<>[];";

/// Check whether a byte separates words
pub fn is_separator(c: u8) -> bool {
    // is_ascii_whitespace leaves out vertical tab
    c.is_ascii_whitespace() || c == 0x0b || c == 0 || SEPARATORS.contains(&c)
}

/// Classify every byte of `render`
///
/// Without a syntax definition every column is [`Highlight::Normal`].
pub fn highlight_row(render: &[u8], syntax: Option<&SyntaxDefinition>) -> Vec<Highlight> {
    let mut hl = vec![Highlight::Normal; render.len()];
    let Some(syntax) = syntax else {
        return hl;
    };

    let comment = syntax.comment.as_deref().map(str::as_bytes);

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut i = 0;

    while i < render.len() {
        let c = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        if let Some(marker) = comment {
            if in_string.is_none() && render[i..].starts_with(marker) {
                hl[i..].fill(Highlight::Comment);
                break;
            }
        }

        if syntax.highlight_strings {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if c == b'\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == b'"' || c == b'\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.highlight_numbers
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == b'.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep {
            let rest = &render[i..];
            let keyword = syntax.keywords.iter().find(|kw| {
                let text = kw.text.as_bytes();
                rest.starts_with(text) && is_separator(rest.get(text.len()).copied().unwrap_or(0))
            });
            if let Some(keyword) = keyword {
                let end = i + keyword.text.len();
                hl[i..end].fill(keyword.highlight());
                i = end;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    hl
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxRegistry;

    use crate::syntax::Highlight::{
        Comment, KeywordPrimary as K1, KeywordSecondary as K2, Normal, Number,
    };

    fn c_syntax() -> SyntaxDefinition {
        SyntaxRegistry::builtin().select("x.c").unwrap().clone()
    }

    fn highlight_c(line: &str) -> Vec<Highlight> {
        highlight_row(line.as_bytes(), Some(&c_syntax()))
    }

    #[test]
    fn test_separators() {
        for &c in b" \t\n\r\x0b\x0c\0,.()+-/*=~%<>[];" {
            assert!(is_separator(c), "{:?} should separate", c as char);
        }
        for &c in b"a_Z09{}\"'#" {
            assert!(!is_separator(c), "{:?} should not separate", c as char);
        }
    }

    #[test]
    fn test_no_syntax_is_normal() {
        let hl = highlight_row(b"int x = 1; // hi", None);
        assert!(hl.iter().all(|&h| h == Normal));
        assert_eq!(hl.len(), 16);
    }

    #[test]
    fn test_secondary_keyword() {
        let hl = highlight_c("int x;");
        assert_eq!(hl, vec![K2, K2, K2, Normal, Normal, Normal]);
    }

    #[test]
    fn test_primary_keyword_needs_separators() {
        assert_eq!(highlight_c("if(x)")[..2], [K1, K1]);
        // Prefix of a longer word
        assert!(highlight_c("iffy").iter().all(|&h| h == Normal));
        // Suffix of a longer word
        assert!(highlight_c("xif ").iter().all(|&h| h == Normal));
        // Keyword at end of row is followed by the implicit NUL
        assert_eq!(highlight_c("return")[..], [K1; 6]);
    }

    #[test]
    fn test_numbers() {
        let hl = highlight_c("x = 3.14;");
        assert_eq!(
            hl,
            vec![Normal, Normal, Normal, Normal, Number, Number, Number, Number, Normal]
        );
        // Digits inside identifiers are not numbers
        assert!(highlight_c("x1").iter().all(|&h| h == Normal));
    }

    #[test]
    fn test_strings_and_escapes() {
        let hl = highlight_c(r#"s = "a\"b";"#);
        let expected: Vec<Highlight> = "NNNNSSSSSSN"
            .chars()
            .map(|c| if c == 'S' { Highlight::String } else { Normal })
            .collect();
        assert_eq!(hl, expected);
    }

    #[test]
    fn test_single_quote_string() {
        let hl = highlight_c("c = 'x';");
        assert_eq!(&hl[4..7], &[Highlight::String; 3]);
        assert_eq!(hl[7], Normal);
    }

    #[test]
    fn test_number_after_string() {
        // Closing a string counts as a separator
        let hl = highlight_c("\"a\"1");
        assert_eq!(hl[3], Number);
    }

    #[test]
    fn test_comment_runs_to_end() {
        let hl = highlight_c("x; // int 42");
        assert_eq!(&hl[..3], &[Normal; 3]);
        assert!(hl[3..].iter().all(|&h| h == Comment));
    }

    #[test]
    fn test_comment_marker_inside_string() {
        let hl = highlight_c("\"//\" x");
        assert_eq!(&hl[..4], &[Highlight::String; 4]);
        assert_eq!(&hl[4..], &[Normal; 2]);
    }

    #[test]
    fn test_unterminated_string_stays_local() {
        let syntax = c_syntax();
        let first = highlight_row(b"\"open", Some(&syntax));
        assert!(first.iter().all(|&h| h == Highlight::String));
        let next = highlight_row(b"int", Some(&syntax));
        assert_eq!(next, vec![K2; 3]);
    }

    #[test]
    fn test_flags_disabled() {
        let syntax = SyntaxDefinition::new("bare").with_keywords(&["if"]);
        let hl = highlight_row(b"if \"s\" 12", Some(&syntax));
        assert_eq!(&hl[..2], &[K1, K1]);
        assert!(hl[2..].iter().all(|&h| h == Normal));
    }

    #[test]
    fn test_idempotent() {
        let syntax = c_syntax();
        let line = b"for (int i = 0; i < 10; i++) { s = \"x\"; } // done";
        assert_eq!(
            highlight_row(line, Some(&syntax)),
            highlight_row(line, Some(&syntax))
        );
    }
}
