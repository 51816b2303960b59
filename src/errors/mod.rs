//! Error types and error handling for the interpreter.
//!
//! This module defines both error taxonomies used by the pipeline:
//!
//! - Parse-time diagnostics with source position information, collected
//!   (not thrown) so a single run reports as many independent errors as
//!   possible
//! - Runtime errors, which propagate through evaluation like return values
//! - Error formatting and colorized display

pub mod errors;

#[cfg(test)]
mod tests;
