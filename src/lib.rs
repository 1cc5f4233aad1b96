//! # radcalc
//!
//! radcalc is a line-oriented calculator for working across number systems.
//! It reads decimal, hexadecimal (`0xff`), octal (`0755`) and binary (`b101`)
//! literals, keeps `$variables` between lines, renders results in any of the
//! four systems, and can save and load its variables as named profiles.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Process configuration.
///
/// Resolves where saved profiles are stored, from the environment or the
/// platform's config directory.
pub mod config;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing,
/// evaluating, or persisting. Every error carries enough context (offending
/// text, byte position, profile name) to be shown to the user as is.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator,
///   storage).
/// - Keeps the nodes parsed before a failure available to the caller.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates lexing, parsing and evaluation of input lines.
///
/// # Responsibilities
/// - Coordinates the scanner, parser and evaluator.
/// - Provides entry points for parsing and evaluating single lines.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// Profile persistence.
///
/// Defines the `ProfileStore` trait the evaluator saves to and loads from,
/// with a file backend and an in-memory backend.
pub mod storage;
/// General utilities for safe numeric conversion.
pub mod util;

pub use error::Error;
pub use interpreter::{evaluator::core::Calculator, parser::parse};

use crate::storage::MemoryStore;

/// Evaluates every line of `source` in order and returns one result per line.
///
/// The lines share a fresh calculator backed by an in-memory profile store,
/// so variables assigned on one line are visible on the next.
///
/// # Errors
/// Returns the first parse or runtime error, which stops evaluation.
///
/// # Examples
/// ```
/// use radcalc::evaluate;
///
/// let results = evaluate("$mask = 0xff\nbin($mask >> 4)").unwrap();
/// assert_eq!(results, ["0xff", "b1111"]);
///
/// // `$y` was never assigned.
/// assert!(evaluate("$x = $y + 1").is_err());
/// ```
pub fn evaluate(source: &str) -> Result<Vec<String>, Error> {
    let mut calculator = Calculator::new(MemoryStore::new());
    source.lines().map(|line| calculator.eval_line(line)).collect()
}
