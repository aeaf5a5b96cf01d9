//! Image info - 一覧表示用の派生ビュー
//!
//! ImageInfo は永続化されない。listing のたびにディレクトリから再計算される。

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Display format for timestamps (`YYYY-MM-DD HH:MM:SS`, local time).
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One entry of the storage root as seen by a listing.
///
/// `name` is the raw directory-entry name. Any regular file placed in the
/// root shows up here, whether or not it was uploaded through the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub name: String,

    /// Birth time. Absent when the filesystem does not expose it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Local>>,

    /// Change/modification time. Absent only when the metadata lookup itself
    /// failed for this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Local>>,
}

impl ImageInfo {
    pub fn new(
        name: impl Into<String>,
        created: Option<DateTime<Local>>,
        modified: Option<DateTime<Local>>,
    ) -> Self {
        Self {
            name: name.into(),
            created,
            modified,
        }
    }

    /// Entry whose timestamps could not be resolved.
    pub fn without_timestamps(name: impl Into<String>) -> Self {
        Self::new(name, None, None)
    }

    pub fn creation_display(&self) -> String {
        format_timestamp(self.created.as_ref())
    }

    pub fn modification_display(&self) -> String {
        format_timestamp(self.modified.as_ref())
    }
}

fn format_timestamp(ts: Option<&DateTime<Local>>) -> String {
    ts.map(|t| t.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}
