//! Parser Trait
//!
//! [`Parser`] turns raw tool output into a typed outcome. Implementations
//! receive the active [`ExecutionConfig`] so limits such as the audit ceiling
//! are never read from global state.
//!
//! # Example
//!
//! ```rust
//! use marker::error::MarkerError;
//! use marker::traits::parser::Parser;
//! use util::execution_config::ExecutionConfig;
//!
//! struct LineCounter;
//!
//! impl<'a> Parser<&'a str, usize> for LineCounter {
//!     fn parse(&self, raw: &'a str, _config: &ExecutionConfig) -> Result<usize, MarkerError> {
//!         Ok(raw.lines().count())
//!     }
//! }
//!
//! let config = ExecutionConfig::default_config();
//! assert_eq!(LineCounter.parse("a\nb\n", &config).unwrap(), 2);
//! ```

use util::execution_config::ExecutionConfig;

use crate::error::MarkerError;

/// A generic trait for parsing tool output into a strongly-typed structure.
///
/// # Type Parameters
///
/// * `Input` - The raw input, usually `&str`.
/// * `Output` - The outcome produced by the parser.
pub trait Parser<Input, Output> {
    /// # Errors
    ///
    /// Returns [`MarkerError::ParseFailure`] if the input does not have the
    /// expected shape.
    fn parse(&self, input: Input, config: &ExecutionConfig) -> Result<Output, MarkerError>;
}
