//! HTTP transport for multipart uploads.

use reqwest::multipart::{Form, Part};

use super::UploadError;
use crate::config::UploadConfig;

/// A single-file multipart POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartRequest {
    pub url: String,
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Status and body of the server's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends multipart requests.
///
/// Futures are not required to be `Send`: the browser event loop is
/// single-threaded and the editor never crosses threads.
#[allow(async_fn_in_trait)]
pub trait UploadTransport {
    async fn send(&self, request: MultipartRequest) -> Result<TransportResponse, UploadError>;
}

/// `reqwest`-backed transport. Uses `fetch` on `wasm32`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &UploadConfig) -> Result<Self, UploadError> {
        let client = client_builder(config)
            .build()
            .map_err(|e| UploadError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn client_builder(config: &UploadConfig) -> reqwest::ClientBuilder {
    reqwest::Client::builder().timeout(std::time::Duration::from_secs(config.timeout_secs))
}

#[cfg(target_arch = "wasm32")]
fn client_builder(_config: &UploadConfig) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
}

fn map_reqwest_error(e: reqwest::Error) -> UploadError {
    if e.is_timeout() {
        UploadError::Network("request timed out".to_string())
    } else {
        UploadError::Network(e.to_string())
    }
}

impl UploadTransport for ReqwestTransport {
    async fn send(&self, request: MultipartRequest) -> Result<TransportResponse, UploadError> {
        let part = Part::bytes(request.bytes)
            .file_name(request.file_name)
            .mime_str(&request.content_type)
            .map_err(|e| UploadError::InvalidRequest(e.to_string()))?;
        let form = Form::new().part(request.field_name, part);

        let response = self
            .client
            .post(&request.url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = TransportResponse {
            status: 201,
            body: String::new(),
        };
        let bad = TransportResponse {
            status: 400,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }

    #[test]
    fn test_builds_default_client() {
        assert!(ReqwestTransport::new(&UploadConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let transport = ReqwestTransport::new(&UploadConfig {
            timeout_secs: 2,
            ..UploadConfig::default()
        })
        .unwrap();

        let result = transport
            .send(MultipartRequest {
                url: "http://127.0.0.1:9/upload".to_string(),
                field_name: "imageFile".to_string(),
                file_name: "x.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: vec![1, 2, 3],
            })
            .await;

        assert!(matches!(result, Err(UploadError::Network(_))));
    }

    #[tokio::test]
    async fn test_bad_content_type_rejected() {
        let transport = ReqwestTransport::new(&UploadConfig::default()).unwrap();
        let result = transport
            .send(MultipartRequest {
                url: "http://127.0.0.1:9/upload".to_string(),
                field_name: "imageFile".to_string(),
                file_name: "x.jpg".to_string(),
                content_type: "not a mime".to_string(),
                bytes: vec![],
            })
            .await;

        assert!(matches!(result, Err(UploadError::InvalidRequest(_))));
    }
}
