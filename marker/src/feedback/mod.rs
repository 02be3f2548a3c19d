//! # Feedback
//!
//! - [`tiered_feedback`]: the default strategy, four levels of detail.
//! - [`runtime_faults`]: catalogue of well-known Java runtime faults.
//! - [`messages`]: English message catalogue.

pub mod messages;
pub mod runtime_faults;
pub mod tiered_feedback;
