//! In-memory transport for client tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use super::{ApiRequest, ApiResponse, Transport};
use crate::core::ApiError;

type Responder = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse, ApiError>>;

/// Records every request and answers from a script.
///
/// Queued responses are served first; once the queue is empty the responder
/// (if any) answers. Each send yields once before answering, so concurrent
/// callers in a `join!` interleave like real network calls.
#[derive(Default)]
pub struct MockTransport {
    queue: RefCell<VecDeque<Result<ApiResponse, ApiError>>>,
    responder: Option<Responder>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responder(
        responder: impl Fn(&ApiRequest) -> Result<ApiResponse, ApiError> + 'static,
    ) -> Self {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::default()
        }
    }

    pub fn push(&self, status: u16, body: serde_json::Value) {
        self.queue
            .borrow_mut()
            .push_back(Ok(ApiResponse::new(status, body.to_string())));
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.queue
            .borrow_mut()
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    pub fn push_error(&self, error: ApiError) {
        self.queue.borrow_mut().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        tokio::task::yield_now().await;

        if let Some(next) = self.queue.borrow_mut().pop_front() {
            return next;
        }
        match &self.responder {
            Some(respond) => respond(request),
            None => Err(ApiError::Network("no scripted response".to_string())),
        }
    }
}

/// A `{ items, meta }` list body.
pub fn list_body(items: serde_json::Value, page: u32, limit: u32, total: u64) -> serde_json::Value {
    let meta = crate::models::PageMeta::compute(page, limit, total);
    serde_json::json!({ "items": items, "meta": meta })
}

pub fn folder_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "parent_id": null,
        "file_count": 0,
        "folder_count": 0,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z",
    })
}

pub fn user_json() -> serde_json::Value {
    serde_json::json!({
        "id": "u1",
        "username": "jdoe",
        "email": "jdoe@example.com",
        "full_name": "Jane Doe",
        "role": "user",
    })
}
