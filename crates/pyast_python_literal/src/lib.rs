//! Literal rendering shared by the lexer (decoding escapes) and the
//! unparser (producing canonical `repr()`-style text): string/bytes
//! escaping, numeric formatting. Grounded on the teacher's
//! `rustpython_literal`/`ruff_python_literal` crate.

pub mod escape;
pub mod float;
pub mod int;

pub use escape::Quote;
