//! Integer formatting. Python integers are arbitrary precision; the AST
//! stores them as [`num_bigint::BigInt`] and the unparser always emits them
//! in base 10 (§4.3), so this is a thin, named wrapper around `BigInt`'s own
//! `Display` rather than a hand-rolled formatter.

use num_bigint::BigInt;

pub fn repr(value: &BigInt) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_large_values() {
        let value: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(repr(&value), "123456789012345678901234567890");
    }

    #[test]
    fn formats_negative_values() {
        let value = BigInt::from(-42);
        assert_eq!(repr(&value), "-42");
    }
}
