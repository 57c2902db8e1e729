//! # Path Expressions
//!
//! A small path language for pulling values out of a JSON value tree:
//! - Field access separated by dots, e.g. `.org.name`
//! - Array selectors in brackets: `[3]`, `[^1]` (from the end), `[1:3]`
//!   (half-open range), `[*]` and `[:]` (every element)
//! - Pure bracket segments for top-level arrays, e.g. `[*].name`
//!
//! Evaluation is lazy: [`fetch`] returns a [`Matches`] iterator that walks the
//! document depth-first and yields one item per terminal branch, either a
//! matched value or the error that ended that branch.

pub mod accessor;
pub mod ast;
pub(crate) mod common;
pub mod error;
pub mod eval;
pub mod parser;
pub mod stream;

use serde_json::Value;

// Re-exports
pub use accessor::*;
pub use ast::*;
pub use common::{JSONPointer, PathType, format_location};
pub use error::*;
pub use eval::*;
pub use parser::*;
pub use stream::*;

/// Evaluates `path` against `json` with the default [`Evaluator`].
///
/// Shorthand for `Evaluator::new().fetch(json, path)`.
#[must_use]
pub fn fetch<'a>(json: &'a Value, path: &'a PathExpression) -> Matches<'a> {
    Evaluator::new().fetch(json, path)
}
