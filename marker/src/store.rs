//! Feedback persistence.
//!
//! Feedback is stored per request id with upsert semantics: grading the same
//! attempt again replaces the earlier record.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::MarkerError;

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn upsert(&self, request_id: &str, feedback: &str) -> Result<(), MarkerError>;

    async fn get(&self, request_id: &str) -> Result<Option<String>, MarkerError>;
}

#[derive(Debug, Default)]
pub struct InMemoryFeedbackStore {
    records: Mutex<HashMap<String, String>>,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn upsert(&self, request_id: &str, feedback: &str) -> Result<(), MarkerError> {
        if request_id.is_empty() {
            return Err(MarkerError::Store("feedback needs a request id".to_string()));
        }
        self.records
            .lock()
            .await
            .insert(request_id.to_string(), feedback.to_string());
        Ok(())
    }

    async fn get(&self, request_id: &str) -> Result<Option<String>, MarkerError> {
        Ok(self.records.lock().await.get(request_id).cloned())
    }
}
