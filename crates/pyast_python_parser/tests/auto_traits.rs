use {
    pyast_python_parser::{Error, LexicalError, ParseError, Tok},
    static_assertions::*,
    std::{
        fmt::Debug,
        marker::{Send, Sync},
        panic::{RefUnwindSafe, UnwindSafe},
    },
};

// A token (or an error) produced by this crate has to be safely movable
// across the thread boundary an embedding application's worker pool puts
// around parsing, same as the teacher's own `ruff_text_size` guarantees.
assert_impl_all!(Tok: Send, Sync, Unpin, UnwindSafe, RefUnwindSafe);
assert_impl_all!(LexicalError: Send, Sync, Unpin, UnwindSafe, RefUnwindSafe);
assert_impl_all!(ParseError: Send, Sync, Unpin, UnwindSafe, RefUnwindSafe);
assert_impl_all!(Error: Send, Sync, Unpin, UnwindSafe, RefUnwindSafe);

assert_impl_all!(Tok: Clone, Debug, PartialEq);
assert_impl_all!(Error: Clone, Debug);
