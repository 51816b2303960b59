//! AST (Abstract Syntax Tree) module.
//!
//! The checked syntax tree, immutable after construction. Every concrete
//! expression node carries its resolved type; unresolvable expressions
//! resolve to `never` with a diagnostic message. `Display` renders nodes
//! back to re-parseable source.

pub mod expressions;
pub mod statements;
