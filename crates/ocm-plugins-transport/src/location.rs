//! Locations used to hand off blob content between the host and a plugin
//! without round-tripping the bytes through the JSON request/response body.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where a blob physically lives, as communicated in an access-specification
/// response or accepted as the destination of a transfer request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "locationType", rename_all = "camelCase")]
pub enum Location {
    /// A path on a filesystem shared between host and plugin.
    LocalFile {
        /// Absolute path to the file.
        path: PathBuf,
    },
    /// A named pipe (Unix domain socket used as a streaming conduit) shared
    /// between host and plugin.
    UnixNamedPipe {
        /// Absolute path to the named pipe.
        path: PathBuf,
    },
    /// A URL the plugin can fetch or push the blob to/from directly.
    RemoteUrl {
        /// The URL.
        url: String,
    },
}

impl Location {
    /// Allocates a fresh temporary file location under `dir`, suitable for a
    /// one-shot blob handoff. The file itself is not created; callers create
    /// it when they write the blob.
    pub fn temp_file(dir: &std::path::Path, prefix: &str) -> std::io::Result<Self> {
        let path = dir.join(format!("{prefix}-{}", uuid::Uuid::new_v4()));
        Ok(Self::LocalFile { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let loc = Location::RemoteUrl {
            url: "https://example.com/blob".to_string(),
        };
        let v = serde_json::to_value(&loc).unwrap();
        assert_eq!(v["locationType"], "remoteUrl");
        assert_eq!(v["url"], "https://example.com/blob");
    }

    #[test]
    fn temp_file_paths_are_unique() {
        let a = Location::temp_file(std::path::Path::new("/tmp"), "blob").unwrap();
        let b = Location::temp_file(std::path::Path::new("/tmp"), "blob").unwrap();
        assert_ne!(a, b);
    }
}
