//! What an upload is for, and where it goes.

use serde::{Deserialize, Serialize};

/// Destination of an upload. Decides the endpoint, the file name and the
/// message shown when the server gives no reason for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum UploadPurpose {
    /// Avatar of one family profile.
    ProfilePhoto {
        #[serde(rename = "profileId")]
        profile_id: u64,
    },
    /// Landing page hero image.
    LandingBackground,
    /// Cover image of a blog post.
    BlogCover,
    /// Image inserted into a blog post body, uploaded uncropped.
    BlogInline,
}

impl UploadPurpose {
    /// Endpoint path relative to the site origin.
    pub fn endpoint(&self) -> String {
        match self {
            UploadPurpose::ProfilePhoto { profile_id } => {
                format!("/admin/family-profiles/{profile_id}/photo")
            }
            UploadPurpose::LandingBackground => "/admin/landing-background/photo".to_string(),
            UploadPurpose::BlogCover | UploadPurpose::BlogInline => {
                "/blog/manage/upload-image".to_string()
            }
        }
    }

    /// File name reported in the multipart part. `extension` includes the dot.
    pub fn file_name(&self, timestamp_ms: u64, extension: &str) -> String {
        match self {
            UploadPurpose::ProfilePhoto { profile_id } => {
                format!("family-profile-{profile_id}-{timestamp_ms}{extension}")
            }
            UploadPurpose::LandingBackground => format!("landing-bg-{timestamp_ms}{extension}"),
            UploadPurpose::BlogCover => format!("cover-{timestamp_ms}{extension}"),
            UploadPurpose::BlogInline => format!("image-{timestamp_ms}{extension}"),
        }
    }

    /// Message used when the server fails without an `error` field.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            UploadPurpose::ProfilePhoto { .. } => "Profile image upload failed.",
            UploadPurpose::LandingBackground => "Landing background upload failed.",
            UploadPurpose::BlogCover => "Cover image upload failed.",
            UploadPurpose::BlogInline => "Image upload failed.",
        }
    }
}
