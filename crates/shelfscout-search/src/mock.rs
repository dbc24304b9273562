//! Scripted catalog for tests and dry runs

use crate::error::SearchError;
use async_trait::async_trait;
use serde_json::Value;
use shelfscout_domain::traits::CatalogSearch;
use shelfscout_domain::{SearchRequest, SearchResponse};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Catalog that replays scripted replies in order and records every request
///
/// Clones share the script and the request log, so a test can hand one
/// clone to the code under test and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    script: Arc<Mutex<VecDeque<Result<Value, SearchError>>>>,
    fallback: Option<Value>,
    requests: Arc<Mutex<Vec<SearchRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockCatalog {
    /// Create an empty mock; unscripted calls fail
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `body` whenever the script is exhausted
    pub fn with_fallback(mut self, body: Value) -> Self {
        self.fallback = Some(body);
        self
    }

    /// Queue a successful reply
    pub fn push_response(&self, body: Value) -> &Self {
        lock(&self.script).push_back(Ok(body));
        self
    }

    /// Queue a failed reply
    pub fn push_error(&self, error: SearchError) -> &Self {
        lock(&self.script).push_back(Err(error));
        self
    }

    /// Requests seen so far, in call order
    pub fn requests(&self) -> Vec<SearchRequest> {
        lock(&self.requests).clone()
    }

    /// Number of search calls made
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Scripted replies not yet consumed
    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }
}

#[async_trait]
impl CatalogSearch for MockCatalog {
    type Error = SearchError;

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, Self::Error> {
        lock(&self.requests).push(request.clone());

        let next = lock(&self.script).pop_front();
        match next {
            Some(reply) => reply.map(SearchResponse::new),
            None => self
                .fallback
                .clone()
                .map(SearchResponse::new)
                .ok_or_else(|| SearchError::InvalidResponse("no scripted reply".to_string())),
        }
    }
}
