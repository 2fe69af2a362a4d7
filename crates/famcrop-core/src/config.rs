//! Configuration for editor presets, the upload client and the media cache.
//!
//! Presets are fixed per call site. Client and cache settings have defaults
//! that match the server and can be overridden from the environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `FAMCROP_BASE_URL` | empty (host supplies the origin) |
//! | `FAMCROP_UPLOAD_TIMEOUT_SECS` | 30 |
//! | `FAMCROP_MAX_UPLOAD_BYTES` | 8 MiB |
//! | `MEDIA_SIGNED_URL_CACHE_MS` | 120000 |
//! | `MEDIA_SIGNED_URL_CACHE_MAX` | 1000 |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encode::DEFAULT_JPEG_QUALITY;
use crate::mask::MaskShape;
use crate::render::{Color, RenderStyle};
use crate::session::DEFAULT_MAX_ZOOM;
use crate::transform::Dimensions;

/// Everything that differs between the crop dialogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropPreset {
    pub preview: Dimensions,
    pub output: Dimensions,
    pub mask: MaskShape,
    pub background: Color,
    pub max_zoom: f64,
    pub quality: u8,
    /// Append `?t=<timestamp>` to the returned URL before display.
    pub cache_bust: bool,
    pub placeholder_label: String,
}

impl CropPreset {
    /// Family profile photo: circular preview, 512px square avatar.
    pub fn profile_photo() -> Self {
        Self {
            preview: Dimensions::new(600, 600),
            output: Dimensions::new(512, 512),
            mask: MaskShape::Circle,
            background: Color::rgb(0xea, 0xf4, 0xff),
            max_zoom: DEFAULT_MAX_ZOOM,
            quality: DEFAULT_JPEG_QUALITY,
            cache_bust: true,
            placeholder_label: "Choose an image".to_string(),
        }
    }

    /// Landing page background, 16:9.
    pub fn landing_background() -> Self {
        Self {
            preview: Dimensions::new(1600, 900),
            output: Dimensions::new(1600, 900),
            mask: MaskShape::Rectangle,
            ..Self::profile_photo()
        }
    }

    /// Blog post cover, 16:9.
    pub fn blog_cover() -> Self {
        Self {
            preview: Dimensions::new(1200, 675),
            output: Dimensions::new(1200, 675),
            mask: MaskShape::Rectangle,
            background: Color::rgb(0xf3, 0xf8, 0xff),
            cache_bust: false,
            ..Self::profile_photo()
        }
    }

    /// Look up a preset by its kebab-case name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "profile-photo" => Some(Self::profile_photo()),
            "landing-background" => Some(Self::landing_background()),
            "blog-cover" => Some(Self::blog_cover()),
            _ => None,
        }
    }

    /// Apply partial overrides on top of this preset.
    pub fn with_overrides(mut self, overrides: PresetOverrides) -> Self {
        if let Some(preview) = overrides.preview {
            self.preview = preview;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(mask) = overrides.mask {
            self.mask = mask;
        }
        if let Some(background) = overrides.background {
            self.background = background;
        }
        if let Some(max_zoom) = overrides.max_zoom {
            self.max_zoom = max_zoom;
        }
        if let Some(quality) = overrides.quality {
            self.quality = quality;
        }
        if let Some(cache_bust) = overrides.cache_bust {
            self.cache_bust = cache_bust;
        }
        if let Some(label) = overrides.placeholder_label {
            self.placeholder_label = label;
        }
        self
    }

    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            background: self.background,
            mask: self.mask,
            placeholder_label: self.placeholder_label.clone(),
        }
    }
}

/// Optional per-field replacements for a [`CropPreset`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresetOverrides {
    pub preview: Option<Dimensions>,
    pub output: Option<Dimensions>,
    pub mask: Option<MaskShape>,
    pub background: Option<Color>,
    pub max_zoom: Option<f64>,
    pub quality: Option<u8>,
    pub cache_bust: Option<bool>,
    pub placeholder_label: Option<String>,
}

/// Upload client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfig {
    /// Origin prepended to endpoint paths, without a trailing slash.
    pub base_url: String,
    /// Request timeout. Not enforced on `wasm32`, where fetch has no timeout.
    pub timeout_secs: u64,
    /// Largest payload sent to the server.
    pub max_upload_bytes: usize,
    /// Multipart field name the server reads the file from.
    pub field_name: String,
}

impl UploadConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;
    pub const FIELD_NAME: &'static str = "imageFile";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values keep the
    /// default and are logged.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let base_url = lookup("FAMCROP_BASE_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.base_url);

        Self {
            base_url,
            timeout_secs: parse_var(&lookup, "FAMCROP_UPLOAD_TIMEOUT_SECS", defaults.timeout_secs),
            max_upload_bytes: parse_var(
                &lookup,
                "FAMCROP_MAX_UPLOAD_BYTES",
                defaults.max_upload_bytes,
            ),
            field_name: defaults.field_name,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            max_upload_bytes: Self::DEFAULT_MAX_UPLOAD_BYTES,
            field_name: Self::FIELD_NAME.to_string(),
        }
    }
}

/// Signed-URL cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaCacheConfig {
    /// Lifetime of a cached URL. Zero disables caching.
    pub ttl_ms: u64,
    /// Maximum number of cached URLs.
    pub max_entries: usize,
}

impl MediaCacheConfig {
    pub const DEFAULT_TTL_MS: u64 = 120_000;
    pub const DEFAULT_MAX_ENTRIES: usize = 1000;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            ttl_ms: parse_var(&lookup, "MEDIA_SIGNED_URL_CACHE_MS", Self::DEFAULT_TTL_MS),
            max_entries: parse_var(
                &lookup,
                "MEDIA_SIGNED_URL_CACHE_MAX",
                Self::DEFAULT_MAX_ENTRIES,
            )
            .max(1),
        }
    }

    pub fn caching_enabled(&self) -> bool {
        self.ttl_ms > 0
    }
}

impl Default for MediaCacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: Self::DEFAULT_TTL_MS,
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return default;
    }
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            log::warn!("ignoring invalid {key}={raw:?}, using default");
            default
        }
    }
}
