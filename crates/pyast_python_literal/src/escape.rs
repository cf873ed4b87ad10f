//! `repr()`-style escaping for str and bytes literals, shared by the lexer
//! (decoding `\N{...}`/`\xHH`/...) and the unparser (re-encoding a decoded
//! string back to quoted source).

use std::fmt::Write;

use unic_ucd_category::GeneralCategory;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
        }
    }

    pub fn opposite(self) -> Quote {
        match self {
            Quote::Single => Quote::Double,
            Quote::Double => Quote::Single,
        }
    }
}

fn is_printable(c: char) -> bool {
    if c.is_ascii() {
        return !c.is_ascii_control();
    }
    !matches!(
        GeneralCategory::of(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::Unassigned
    ) || c == ' '
}

/// Chooses the quote style with the fewest required escapes, preferring
/// single quotes on a tie, matching CPython's `repr()`.
pub fn preferred_quote(text: &str, prefer: Quote) -> Quote {
    let singles = text.matches('\'').count();
    let doubles = text.matches('"').count();
    if doubles > singles {
        Quote::Single
    } else if singles > doubles {
        Quote::Double
    } else {
        prefer
    }
}

/// The escaped body of a string literal, without the surrounding quote
/// characters. Factored out of [`unicode_escape`] so the f-string
/// reassembler in the unparser can splice literal segments between
/// replacement fields without re-adding delimiters it doesn't own.
pub fn unicode_escape_body(text: &str, quote: Quote) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote.as_char() => {
                out.push('\\');
                out.push(c);
            }
            c if is_printable(c) => out.push(c),
            c if (c as u32) < 0x100 => {
                write!(out, "\\x{:02x}", c as u32).unwrap();
            }
            c if (c as u32) < 0x10000 => {
                write!(out, "\\u{:04x}", c as u32).unwrap();
            }
            c => {
                write!(out, "\\U{:08x}", c as u32).unwrap();
            }
        }
    }
    out
}

/// Renders `text` as a quoted, escaped Python string literal body (without
/// the prefix), choosing `quote` as the delimiter.
pub fn unicode_escape(text: &str, quote: Quote) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote.as_char());
    out.push_str(&unicode_escape_body(text, quote));
    out.push(quote.as_char());
    out
}

/// Renders `text` with a triple-quote delimiter, keeping literal newlines
/// unescaped (§4.3: "use triple quotes when the string contains a
/// newline"). Any occurrence of the chosen quote character is escaped
/// unconditionally rather than only where it would abut the closing
/// delimiter, which is always safe and keeps this simple.
pub fn triple_quote_escape(text: &str, quote: Quote) -> String {
    let delim: String = std::iter::repeat(quote.as_char()).take(3).collect();
    let mut out = String::with_capacity(text.len() + 6);
    out.push_str(&delim);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push('\n'),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote.as_char() => {
                out.push('\\');
                out.push(c);
            }
            c if is_printable(c) || c == '\n' => out.push(c),
            c if (c as u32) < 0x100 => {
                write!(out, "\\x{:02x}", c as u32).unwrap();
            }
            c if (c as u32) < 0x10000 => {
                write!(out, "\\u{:04x}", c as u32).unwrap();
            }
            c => {
                write!(out, "\\U{:08x}", c as u32).unwrap();
            }
        }
    }
    out.push_str(&delim);
    out
}

/// Chooses the delimiter for a triple-quoted literal: prefer `'''`, but
/// fall back to `"""` when the text already contains a run of three single
/// quotes.
pub fn preferred_triple_quote(text: &str) -> Quote {
    if text.contains("'''") && !text.contains("\"\"\"") {
        Quote::Double
    } else {
        Quote::Single
    }
}

/// Same tie-breaking rule as [`preferred_quote`], for bytes literals.
pub fn preferred_quote_bytes(bytes: &[u8], prefer: Quote) -> Quote {
    let singles = bytes.iter().filter(|&&b| b == b'\'').count();
    let doubles = bytes.iter().filter(|&&b| b == b'"').count();
    if doubles > singles {
        Quote::Single
    } else if singles > doubles {
        Quote::Double
    } else {
        prefer
    }
}

/// Renders a bytes literal body (without the `b` prefix).
pub fn ascii_escape(bytes: &[u8], quote: Quote) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push(quote.as_char());
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b if b == quote.as_char() as u8 => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7e => out.push(b as char),
            _ => {
                write!(out, "\\x{b:02x}").unwrap();
            }
        }
    }
    out.push(quote.as_char());
    out
}

/// True if the decoded string would need triple-quoting to contain a
/// literal newline without a `\n` escape. Unused by the canonical unparser
/// (which always escapes newlines), kept for tooling that wants a
/// multi-line rendering.
pub fn contains_unescaped_newline(text: &str) -> bool {
    text.contains('\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_backslash_and_quote() {
        assert_eq!(unicode_escape("a'b", Quote::Single), r"'a\'b'");
    }

    #[test]
    fn escapes_control_chars() {
        assert_eq!(unicode_escape("a\nb", Quote::Single), "'a\\nb'");
    }

    #[test]
    fn prefers_single_quote_on_tie() {
        assert_eq!(preferred_quote("no quotes here", Quote::Single), Quote::Single);
    }

    #[test]
    fn prefers_single_when_double_quotes_present() {
        assert_eq!(preferred_quote("has \"double\" quotes", Quote::Single), Quote::Single);
    }

    #[test]
    fn prefers_double_when_single_quotes_present() {
        assert_eq!(preferred_quote("it's here", Quote::Single), Quote::Double);
    }
}
