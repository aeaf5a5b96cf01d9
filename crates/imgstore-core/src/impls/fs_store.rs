//! FsImageStore - ローカルファイルシステム上の Storage Engine
//!
//! # 実装詳細
//! - write: create/truncate してから全量書き込み（Unix では 0644）
//! - read: `NotFound` だけを区別し、それ以外は Io
//! - list_entries: root 直下のみ（再帰しない）、名前順
//!
//! rename による atomic write はしない。書き込み中の読み出しは途中の内容を
//! 観測しうる。

use std::fs::Metadata;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::domain::ImageInfo;
use crate::ports::{ImageStore, StoreError};

/// Storage Engine backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageStore;

impl FsImageStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let mut opts = tokio::fs::OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        opts.mode(0o644);

        let io_err = |e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        let mut file = opts.open(path).await.map_err(io_err)?;
        file.write_all(bytes).await.map_err(io_err)?;
        // tokio の File は drop 前に flush しないと書き込みが残りうる
        file.flush().await.map_err(io_err)?;
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| StoreError::from_io(path, e))
    }

    async fn list_entries(&self, root: &Path) -> Result<Vec<ImageInfo>, StoreError> {
        let list_err = |e| StoreError::ListDir {
            path: root.to_path_buf(),
            source: e,
        };
        let mut dir = tokio::fs::read_dir(root).await.map_err(list_err)?;

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(list_err)? {
            let name = entry.file_name().to_string_lossy().into_owned();

            // symlink は辿る。stat 失敗は握りつぶす（一覧全体は失敗させない）
            let info = match tokio::fs::metadata(entry.path()).await {
                Ok(meta) if meta.is_dir() => continue,
                Ok(meta) => ImageInfo::new(name, birth_time(&meta), change_time(&meta)),
                Err(e) => {
                    debug!(entry = %name, error = %e, "cannot stat entry, timestamps left empty");
                    ImageInfo::without_timestamps(name)
                }
            };
            entries.push(info);
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Birth time, when the platform and filesystem expose it.
fn birth_time(meta: &Metadata) -> Option<DateTime<Local>> {
    meta.created().ok().map(DateTime::<Local>::from)
}

/// Inode change time on Unix, modification time elsewhere.
#[cfg(unix)]
fn change_time(meta: &Metadata) -> Option<DateTime<Local>> {
    use std::os::unix::fs::MetadataExt;

    DateTime::from_timestamp(meta.ctime(), meta.ctime_nsec() as u32)
        .map(|t| t.with_timezone(&Local))
}

#[cfg(not(unix))]
fn change_time(meta: &Metadata) -> Option<DateTime<Local>> {
    meta.modified().ok().map(DateTime::<Local>::from)
}
