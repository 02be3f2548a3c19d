//! # Parsers
//!
//! Parsers for the raw text produced by the toolchain. Both implement the
//! [`Parser`](crate::traits::parser::Parser) trait.
//!
//! - [`test_output_parser`]: counts tests, failures and errors in JUnit runner output.
//! - [`audit_parser`]: counts style findings in checkstyle output.

pub mod audit_parser;
pub mod test_output_parser;
