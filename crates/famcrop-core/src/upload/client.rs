//! Upload client: pre-flight checks, request assembly, response parsing.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{
    parse_upload_response, MultipartRequest, ReqwestTransport, UploadError, UploadPurpose,
    UploadTransport,
};
use crate::config::UploadConfig;
use crate::encode::EncodedImage;

const SAFE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".webp", ".gif"];

/// Where an upload goes and when it was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadHints {
    pub purpose: UploadPurpose,
    /// Milliseconds since the Unix epoch, used in the file name.
    pub timestamp_ms: u64,
}

/// A stored image as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Durable value to persist: a storage reference or a plain URL.
    pub reference: String,
    /// URL the browser can load right away.
    pub display_url: String,
}

impl UploadResult {
    /// `display_url` with a `t=<timestamp>` query parameter appended.
    pub fn cache_busted(&self, timestamp_ms: u64) -> String {
        let separator = if self.display_url.contains('?') { '&' } else { '?' };
        format!("{}{separator}t={timestamp_ms}", self.display_url)
    }
}

/// Map a user file name to an extension the server accepts.
///
/// Anything outside `.jpg/.jpeg/.png/.webp/.gif` becomes `.jpg`.
pub fn safe_extension(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    lower
        .rfind('.')
        .map(|dot| &lower[dot..])
        .and_then(|ext| SAFE_EXTENSIONS.iter().copied().find(|safe| *safe == ext))
        .unwrap_or(".jpg")
}

/// Posts images to the site backend.
#[derive(Debug)]
pub struct UploadClient<T = ReqwestTransport> {
    config: UploadConfig,
    transport: Rc<T>,
}

impl<T> Clone for UploadClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Rc::clone(&self.transport),
        }
    }
}

impl UploadClient<ReqwestTransport> {
    /// Client over a fresh `reqwest` transport.
    pub fn new(config: UploadConfig) -> Result<Self, UploadError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: UploadTransport> UploadClient<T> {
    pub fn with_transport(config: UploadConfig, transport: T) -> Self {
        Self {
            config,
            transport: Rc::new(transport),
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Upload an exported crop.
    pub async fn upload(
        &self,
        image: EncodedImage,
        hints: UploadHints,
    ) -> Result<UploadResult, UploadError> {
        let extension = if image.mime == "image/png" { ".png" } else { ".jpg" };
        let file_name = hints.purpose.file_name(hints.timestamp_ms, extension);
        self.send(image.bytes, file_name, image.mime.to_string(), hints.purpose)
            .await
    }

    /// Upload a user file as-is, without cropping.
    ///
    /// Only `image/*` types are accepted, matching the server's filter.
    pub async fn upload_file(
        &self,
        bytes: Vec<u8>,
        original_name: &str,
        mime: &str,
        hints: UploadHints,
    ) -> Result<UploadResult, UploadError> {
        if !mime.to_ascii_lowercase().starts_with("image/") {
            return Err(UploadError::InvalidRequest(
                "Only image uploads are allowed.".to_string(),
            ));
        }
        let file_name = hints
            .purpose
            .file_name(hints.timestamp_ms, safe_extension(original_name));
        self.send(bytes, file_name, mime.to_string(), hints.purpose)
            .await
    }

    async fn send(
        &self,
        bytes: Vec<u8>,
        file_name: String,
        content_type: String,
        purpose: UploadPurpose,
    ) -> Result<UploadResult, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::InvalidRequest("empty file".to_string()));
        }
        let limit = self.config.max_upload_bytes;
        if bytes.len() > limit {
            return Err(UploadError::TooLarge {
                size: bytes.len(),
                limit,
            });
        }

        let url = format!("{}{}", self.config.base_url, purpose.endpoint());
        log::info!("uploading {file_name} ({} bytes) to {url}", bytes.len());

        let request = MultipartRequest {
            url,
            field_name: self.config.field_name.clone(),
            file_name,
            content_type,
            bytes,
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("upload transport failed: {e}");
                return Err(e);
            }
        };

        let result = parse_upload_response(&response, &purpose);
        match &result {
            Ok(uploaded) => log::info!("upload stored as {}", uploaded.reference),
            Err(e) => log::warn!("upload rejected ({}): {e}", response.status),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::testing::FakeTransport;

    fn jpeg(len: usize) -> EncodedImage {
        EncodedImage {
            bytes: vec![0xAB; len],
            width: 512,
            height: 512,
            mime: "image/jpeg",
        }
    }

    fn client(fake: FakeTransport) -> UploadClient<FakeTransport> {
        UploadClient::with_transport(UploadConfig::new("https://family.example"), fake)
    }

    const PROFILE_HINTS: UploadHints = UploadHints {
        purpose: UploadPurpose::ProfilePhoto { profile_id: 12 },
        timestamp_ms: 1_700_000_000_000,
    };

    #[tokio::test]
    async fn test_profile_upload_request_shape() {
        let client = client(FakeTransport::answering(
            200,
            r#"{"ok":true,"imageUrl":"/uploads/profiles/12.jpg"}"#,
        ));

        let result = client.upload(jpeg(100), PROFILE_HINTS).await.unwrap();

        assert_eq!(result.display_url, "/uploads/profiles/12.jpg");
        let requests = client.transport().requests.borrow();
        let request = &requests[0];
        assert_eq!(request.url, "https://family.example/admin/family-profiles/12/photo");
        assert_eq!(request.field_name, "imageFile");
        assert_eq!(request.file_name, "family-profile-12-1700000000000.jpg");
        assert_eq!(request.content_type, "image/jpeg");
        assert_eq!(request.bytes.len(), 100);
    }

    #[tokio::test]
    async fn test_too_large_skips_network() {
        let fake = FakeTransport::answering(200, r#"{"ok":true,"imageUrl":"/x.jpg"}"#);
        let client = UploadClient::with_transport(
            UploadConfig {
                max_upload_bytes: 10,
                ..UploadConfig::default()
            },
            fake,
        );

        let err = client.upload(jpeg(11), PROFILE_HINTS).await.unwrap_err();

        assert_eq!(err, UploadError::TooLarge { size: 11, limit: 10 });
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_blob_skips_network() {
        let client = client(FakeTransport::default());
        let err = client.upload(jpeg(0), PROFILE_HINTS).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidRequest(_)));
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_network_failure_propagates() {
        let client = client(FakeTransport::failing(UploadError::Network(
            "connection reset".to_string(),
        )));
        let err = client.upload(jpeg(5), PROFILE_HINTS).await.unwrap_err();
        assert_eq!(err, UploadError::Network("connection reset".to_string()));
    }

    #[tokio::test]
    async fn test_rejection_message_surfaces() {
        let client = client(FakeTransport::answering(
            400,
            r#"{"ok":false,"error":"No image uploaded."}"#,
        ));
        let err = client.upload(jpeg(5), PROFILE_HINTS).await.unwrap_err();
        assert_eq!(err.to_string(), "No image uploaded.");
    }

    #[tokio::test]
    async fn test_inline_file_upload_keeps_safe_extension() {
        let client = client(FakeTransport::answering(
            200,
            r#"{"ok":true,"imageRef":"sb://media/blog/a.png","imageUrl":"https://cdn/a.png"}"#,
        ));
        let hints = UploadHints {
            purpose: UploadPurpose::BlogInline,
            timestamp_ms: 5,
        };

        let result = client
            .upload_file(vec![1, 2, 3], "Holiday.PNG", "image/png", hints)
            .await
            .unwrap();

        assert_eq!(result.reference, "sb://media/blog/a.png");
        let requests = client.transport().requests.borrow();
        assert_eq!(requests[0].file_name, "image-5.png");
        assert_eq!(requests[0].url, "https://family.example/blog/manage/upload-image");
    }

    #[tokio::test]
    async fn test_inline_file_upload_rejects_non_image() {
        let client = client(FakeTransport::default());
        let hints = UploadHints {
            purpose: UploadPurpose::BlogInline,
            timestamp_ms: 5,
        };
        let err = client
            .upload_file(vec![1], "notes.txt", "text/plain", hints)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::InvalidRequest(_)));
        assert_eq!(client.transport().request_count(), 0);
    }

    #[test]
    fn test_safe_extension() {
        assert_eq!(safe_extension("a.JPEG"), ".jpeg");
        assert_eq!(safe_extension("b.webp"), ".webp");
        assert_eq!(safe_extension("c.gif"), ".gif");
        assert_eq!(safe_extension("d.heic"), ".jpg");
        assert_eq!(safe_extension("no-extension"), ".jpg");
        assert_eq!(safe_extension("archive.png.exe"), ".jpg");
    }

    #[test]
    fn test_cache_busted() {
        let result = UploadResult {
            reference: "/p.jpg".to_string(),
            display_url: "/p.jpg".to_string(),
        };
        assert_eq!(result.cache_busted(99), "/p.jpg?t=99");

        let signed = UploadResult {
            reference: "sb://m/p.jpg".to_string(),
            display_url: "https://cdn/p.jpg?token=abc".to_string(),
        };
        assert_eq!(signed.cache_busted(99), "https://cdn/p.jpg?token=abc&t=99");
    }

    #[test]
    fn test_client_is_cheap_to_clone() {
        let client = client(FakeTransport::default());
        let copy = client.clone();
        assert!(std::ptr::eq(client.transport(), copy.transport()));
    }
}
