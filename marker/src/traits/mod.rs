//!
//! Traits Module
//!
//! - [`feedback`]: strategy trait for rendering feedback text.
//! - [`parser`]: generic trait for parsing tool output into typed outcomes.

pub mod feedback;
pub mod parser;
