//! Number scanning (§4.1 "Number scanning"): the lexer collects the raw
//! digit text (with underscores already validated for placement) and hands
//! it here to strip separators and convert to the cooked value.

use lexical_parse_float::FromLexical;
use num_bigint::BigInt;

use crate::error::LexicalErrorType;

#[derive(Clone, Debug, PartialEq)]
pub enum NumberValue {
    Int(BigInt),
    Float(f64),
    Complex { real: f64, imag: f64 },
}

/// Converts a validated decimal integer lexeme (underscores allowed between
/// digits) to a `BigInt`. Overflow is not an error (§4.1): `BigInt` is
/// arbitrary precision.
pub fn parse_decimal_int(raw: &str) -> Result<BigInt, LexicalErrorType> {
    let stripped = strip_underscores(raw);
    stripped
        .parse::<BigInt>()
        .map_err(|_| LexicalErrorType::OtherError(format!("invalid decimal literal {raw:?}")))
}

/// Converts a `0x`/`0o`/`0b`-prefixed lexeme (prefix already stripped by the
/// caller) in the given `radix`.
pub fn parse_radix_int(raw: &str, radix: u32) -> Result<BigInt, LexicalErrorType> {
    let stripped = strip_underscores(raw);
    BigInt::parse_bytes(stripped.as_bytes(), radix)
        .ok_or_else(|| LexicalErrorType::OtherError(format!("invalid literal {raw:?} for base {radix}")))
}

/// Converts a float lexeme (decimal point and/or exponent, underscores
/// allowed) to `f64`.
pub fn parse_float(raw: &str) -> Result<f64, LexicalErrorType> {
    let stripped = strip_underscores(raw);
    f64::from_lexical(stripped.as_bytes())
        .map_err(|_| LexicalErrorType::OtherError(format!("invalid float literal {raw:?}")))
}

fn strip_underscores(raw: &str) -> String {
    raw.chars().filter(|&c| c != '_').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_underscore_group_separators() {
        assert_eq!(parse_decimal_int("1_000_000").unwrap(), BigInt::from(1_000_000));
    }

    #[test]
    fn hex_with_separators() {
        assert_eq!(parse_radix_int("1_F", 16).unwrap(), BigInt::from(31));
    }

    #[test]
    fn float_with_exponent() {
        assert!((parse_float("1_0.5e1").unwrap() - 105.0).abs() < f64::EPSILON);
    }
}
