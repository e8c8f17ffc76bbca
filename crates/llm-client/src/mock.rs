//! Scripted language model for tests.
//!
//! Replies are served in the order they were queued. Once the queue is empty
//! the model keeps returning the `repeating` reply if one was set, otherwise it
//! fails with `EmptyResponse`. Every prompt is recorded.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{LlmError, Result};
use crate::LanguageModel;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Failure(String),
}

#[derive(Clone, Default)]
pub struct MockLanguageModel {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    repeating: Arc<Mutex<Option<Reply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a completion.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(Reply::Text(text.into()));
        self
    }

    /// Queue a network failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(Reply::Failure(message.into()));
        self
    }

    /// Completion returned for every call after the queue runs dry.
    pub fn repeating(self, text: impl Into<String>) -> Self {
        *lock(&self.repeating) = Some(Reply::Text(text.into()));
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    fn push(&self, reply: Reply) {
        lock(&self.replies).push_back(reply);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    fn model_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        lock(&self.prompts).push(prompt.to_string());

        let next = lock(&self.replies).pop_front();
        let reply = match next {
            Some(reply) => reply,
            None => lock(&self.repeating).clone().ok_or(LlmError::EmptyResponse)?,
        };

        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Failure(message) => Err(LlmError::Network(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_then_repeat() {
        let model = MockLanguageModel::new()
            .with_response("first")
            .with_failure("connection reset")
            .repeating("again");

        assert_eq!(model.complete("a").await.unwrap(), "first");
        assert!(matches!(model.complete("b").await, Err(LlmError::Network(_))));
        assert_eq!(model.complete("c").await.unwrap(), "again");
        assert_eq!(model.complete("d").await.unwrap(), "again");

        assert_eq!(model.prompts(), vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_exhausted_queue_fails() {
        let model = MockLanguageModel::new();
        assert!(matches!(model.complete("x").await, Err(LlmError::EmptyResponse)));
        assert_eq!(model.call_count(), 1);
    }
}
