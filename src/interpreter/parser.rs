/// Parser state, the item pump and the dispatch loop.
///
/// Also provides [`parse`], which runs the scanner concurrently and feeds its
/// items to a [`Parser`].
pub mod core;

/// Expression items.
///
/// Validates numbers, variables, operators, parentheses, `abs` and the
/// assignment `=` against the node on their left, and fuses unary minus into
/// number literals.
pub mod expression;

/// Whole-line verbs.
///
/// Handles the output settings `dec hex bin oct` and the fixed forms
/// `clear()`, `save(name)` and `load(name)`.
pub mod verb;

pub use core::{ParseResult, Parser, parse};
