//! Mock transport for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::traits::*;
use crate::error::Result;

type Responder = Arc<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

/// Mock transport for testing.
///
/// Serves queued responses first, then falls back to the responder (if
/// set) or to `{"status": true}`. Every request is recorded. Clones share
/// state, so a test can keep a handle after moving one into a client.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<HttpResponse>>>,
    responder: Option<Responder>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 response with the given body.
    pub fn with_response(self, body: impl Into<String>) -> Self {
        self.push_response(HttpResponse::ok(body));
        self
    }

    /// Compute responses from the request once the queue is empty.
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        self.responder = Some(Arc::new(responder));
        self
    }

    /// Queue a response.
    pub fn push_response(&self, response: HttpResponse) {
        lock(&self.responses).push_back(response);
    }

    /// All requests sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Number of requests sent.
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let queued = lock(&self.responses).pop_front();
        let response = match (queued, &self.responder) {
            (Some(response), _) => response,
            (None, Some(responder)) => responder(&request),
            (None, None) => HttpResponse::ok(r#"{"status": true}"#),
        };

        lock(&self.requests).push(request);
        Ok(response)
    }
}
