//! Interpretation of the upload endpoint's JSON answer.

use serde::Deserialize;

use super::{TransportResponse, UploadError, UploadPurpose, UploadResult};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UploadResponseBody {
    ok: bool,
    image_url: Option<String>,
    image_ref: Option<String>,
    location: Option<String>,
    error: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Turn a transport response into an [`UploadResult`].
///
/// Failure text from the server is passed through verbatim. When the server
/// gives none, the purpose's fallback message is used.
pub fn parse_upload_response(
    response: &TransportResponse,
    purpose: &UploadPurpose,
) -> Result<UploadResult, UploadError> {
    let rejected = |message: Option<String>| UploadError::Rejected {
        status: response.status,
        message: message.unwrap_or_else(|| purpose.fallback_message().to_string()),
    };

    let body: UploadResponseBody = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) => {
            log::warn!(
                "upload to {} answered {} with a non-JSON body: {e}",
                purpose.endpoint(),
                response.status
            );
            return Err(rejected(None));
        }
    };

    if !response.is_success() || !body.ok {
        return Err(rejected(non_empty(body.error)));
    }

    let image_url = non_empty(body.image_url);
    let location = non_empty(body.location);
    let display_url = image_url.or(location).ok_or(UploadError::MissingUrl)?;
    let reference = non_empty(body.image_ref).unwrap_or_else(|| display_url.clone());

    Ok(UploadResult {
        reference,
        display_url,
    })
}
