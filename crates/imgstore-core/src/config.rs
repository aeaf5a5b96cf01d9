//! Gateway configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_UPLOAD_READ_LIMIT: usize = 10;
pub const DEFAULT_LIST_LIMIT: usize = 100;
pub const DEFAULT_ROOT_DIR: &str = "media";
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Everything the gateway needs at construction time.
///
/// Limits are fixed for the gateway's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Shared budget for uploads and single-image reads.
    pub upload_read_limit: usize,
    /// Budget for listings.
    pub list_limit: usize,
    pub root_dir: PathBuf,
    /// Extension appended on upload, without the leading dot.
    pub extension: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            upload_read_limit: DEFAULT_UPLOAD_READ_LIMIT,
            list_limit: DEFAULT_LIST_LIMIT,
            root_dir: PathBuf::from(DEFAULT_ROOT_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = GatewayConfig::default();
        assert_eq!(cfg.upload_read_limit, 10);
        assert_eq!(cfg.list_limit, 100);
        assert_eq!(cfg.root_dir, PathBuf::from("media"));
        assert_eq!(cfg.extension, "jpg");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: GatewayConfig =
            serde_json::from_str(r#"{ "extension": "png", "list_limit": 3 }"#).unwrap();
        assert_eq!(cfg.extension, "png");
        assert_eq!(cfg.list_limit, 3);
        assert_eq!(cfg.upload_read_limit, DEFAULT_UPLOAD_READ_LIMIT);
    }
}
