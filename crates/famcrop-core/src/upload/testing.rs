//! In-memory transport for tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use super::{MultipartRequest, TransportResponse, UploadError, UploadTransport};

/// Records requests and replays canned responses in order.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    pub requests: RefCell<Vec<MultipartRequest>>,
    pub responses: RefCell<VecDeque<Result<TransportResponse, UploadError>>>,
}

impl FakeTransport {
    pub(crate) fn answering(status: u16, body: &str) -> Self {
        let fake = Self::default();
        fake.push(status, body);
        fake
    }

    pub(crate) fn push(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(Ok(TransportResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub(crate) fn failing(error: UploadError) -> Self {
        let fake = Self::default();
        fake.responses.borrow_mut().push_back(Err(error));
        fake
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl UploadTransport for FakeTransport {
    async fn send(&self, request: MultipartRequest) -> Result<TransportResponse, UploadError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(UploadError::Network("no canned response".to_string())))
    }
}
