//! `sb://bucket/path` storage references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const STORAGE_REF_PREFIX: &str = "sb://";

/// Pointer to an object in a storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRef {
    pub bucket: String,
    pub object_path: String,
}

/// The value is not a well-formed storage reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a storage reference: {0}")]
pub struct NotAStorageRef(pub String);

impl StorageRef {
    pub fn new(bucket: impl Into<String>, object_path: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            object_path: object_path.into(),
        }
    }

    /// Parse `sb://<bucket>/<path>`. Both parts must be non-empty.
    pub fn parse(value: &str) -> Option<Self> {
        let payload = value.trim().strip_prefix(STORAGE_REF_PREFIX)?;
        let (bucket, object_path) = payload.split_once('/')?;
        if bucket.is_empty() || object_path.is_empty() {
            return None;
        }
        Some(Self::new(bucket, object_path))
    }
}

/// Whether a value uses the storage reference scheme at all.
///
/// A value can pass this and still fail [`StorageRef::parse`].
pub fn is_storage_ref(value: &str) -> bool {
    value.trim().starts_with(STORAGE_REF_PREFIX)
}

impl fmt::Display for StorageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{STORAGE_REF_PREFIX}{}/{}", self.bucket, self.object_path)
    }
}

impl FromStr for StorageRef {
    type Err = NotAStorageRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| NotAStorageRef(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_path() {
        let r = StorageRef::parse("sb://family-media/blog/2024/a.jpg").unwrap();
        assert_eq!(r.bucket, "family-media");
        assert_eq!(r.object_path, "blog/2024/a.jpg");
    }

    #[test]
    fn test_parse_trims() {
        assert!(StorageRef::parse("  sb://b/x.jpg \n").is_some());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(StorageRef::parse("sb://bucket").is_none());
        assert!(StorageRef::parse("sb:///x").is_none());
        assert!(StorageRef::parse("sb://bucket/").is_none());
        assert!(StorageRef::parse("https://cdn/x.jpg").is_none());
        assert!(StorageRef::parse("").is_none());
    }

    #[test]
    fn test_display_round_trip() {
        let r = StorageRef::new("media", "profiles/1.jpg");
        assert_eq!(r.to_string(), "sb://media/profiles/1.jpg");
        assert_eq!(r.to_string().parse::<StorageRef>().unwrap(), r);
    }

    #[test]
    fn test_is_storage_ref() {
        assert!(is_storage_ref("sb://x"));
        assert!(!is_storage_ref("/uploads/x.jpg"));
    }

    #[test]
    fn test_from_str_error() {
        let err = "nope".parse::<StorageRef>().unwrap_err();
        assert_eq!(err.to_string(), "not a storage reference: nope");
    }
}
