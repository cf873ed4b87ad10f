//! The AST data model shared by the parser and the unparser: node shapes,
//! the `Ranged` location trait (re-exported from `pyast_text_size`), the
//! reflection machinery behind `dump`/`iterFields`, and the two visitor
//! flavors (`visitor`, source-order; `preorder`, kind-keyed).

pub mod identifier;
pub mod node;
pub mod nodes;
pub mod precedence;
pub mod preorder;
pub mod visitor;

pub use node::{child_nodes, fields, AnyNodeRef, FieldValue};
pub use nodes::*;
pub use pyast_text_size::Ranged;
