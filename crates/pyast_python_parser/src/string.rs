//! String-literal escape decoding (§4.1 "String scanning"). Raw strings skip
//! this entirely; non-raw strings decode the standard escape set, passing
//! unknown escapes through verbatim as the spec allows.

use crate::error::LexicalErrorType;

/// Decodes the body of a non-raw string (between the quotes, after prefix
/// stripping) according to §4.1's escape table. `is_bytes` rejects non-ASCII
/// literal characters and limits `\xHH`/octal escapes to byte values rather
/// than decoding `\N{...}`/`\u`/`\U`, which are string-only.
pub fn decode_escapes(raw: &str, is_bytes: bool) -> Result<String, LexicalErrorType> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            if is_bytes && !c.is_ascii() {
                return Err(LexicalErrorType::InvalidByteLiteral);
            }
            out.push(c);
            continue;
        }

        match chars.next() {
            None => return Err(LexicalErrorType::UnterminatedString),
            // Line continuation inside a string literal: the backslash and
            // the newline it precedes both disappear.
            Some('\n') => {}
            Some('\r') => {
                chars.next_if_eq(&'\n');
            }
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('a') => out.push('\u{7}'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\u{b}'),
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).expect("octal digit");
                for _ in 0..2 {
                    match chars.peek() {
                        Some(&next) if next.is_digit(8) => {
                            value = value * 8 + next.to_digit(8).expect("octal digit");
                            chars.next();
                        }
                        _ => break,
                    }
                }
                push_byte_or_char(&mut out, value, is_bytes)?;
            }
            Some('x') => {
                let value = read_fixed_hex(&mut chars, 2)?;
                push_byte_or_char(&mut out, value, is_bytes)?;
            }
            Some('u') if !is_bytes => {
                let value = read_fixed_hex(&mut chars, 4)?;
                out.push(char::from_u32(value).ok_or(LexicalErrorType::StringError)?);
            }
            Some('U') if !is_bytes => {
                let value = read_fixed_hex(&mut chars, 8)?;
                out.push(char::from_u32(value).ok_or(LexicalErrorType::StringError)?);
            }
            Some('N') if !is_bytes => {
                if chars.next() != Some('{') {
                    return Err(LexicalErrorType::StringError);
                }
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(LexicalErrorType::StringError);
                }
                let resolved = unicode_names2::character(&name).ok_or(LexicalErrorType::StringError)?;
                out.push(resolved);
            }
            // Unknown escapes are passed through verbatim (§4.1): CPython
            // keeps the backslash and emits a `DeprecationWarning`, which
            // this crate (a library, not a diagnostics frontend) does not
            // surface.
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

fn push_byte_or_char(out: &mut String, value: u32, is_bytes: bool) -> Result<(), LexicalErrorType> {
    if is_bytes {
        out.push(char::from_u32(value & 0xff).expect("byte value is a valid char"));
    } else {
        out.push(char::from_u32(value).ok_or(LexicalErrorType::StringError)?);
    }
    Ok(())
}

fn read_fixed_hex(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    count: usize,
) -> Result<u32, LexicalErrorType> {
    let mut value = 0u32;
    for _ in 0..count {
        let c = chars.next().ok_or(LexicalErrorType::StringError)?;
        let digit = c.to_digit(16).ok_or(LexicalErrorType::StringError)?;
        value = value * 16 + digit;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_standard_escapes() {
        assert_eq!(decode_escapes(r"a\nb\t\\", false).unwrap(), "a\nb\t\\");
    }

    #[test]
    fn decodes_hex_escape() {
        assert_eq!(decode_escapes(r"\x41", false).unwrap(), "A");
    }

    #[test]
    fn decodes_unicode_name_escape() {
        assert_eq!(decode_escapes(r"\N{BULLET}", false).unwrap(), "\u{2022}");
    }

    #[test]
    fn unknown_escape_passes_through() {
        assert_eq!(decode_escapes(r"\q", false).unwrap(), "\\q");
    }

    #[test]
    fn line_continuation_disappears() {
        assert_eq!(decode_escapes("a\\\nb", false).unwrap(), "ab");
    }
}
