//! Grading service.
//!
//! Accepts the form posted by remote grading clients, runs the submission
//! with the local backend and answers with the JSON execution result.

pub mod api;
