//! ImageStore port - Storage Engine（ローカル FS または InMemory）
//!
//! ImageStore は 3 つの物理操作だけを提供します：
//! - write: ファイルの作成または上書き
//! - read: ファイル全体の読み出し
//! - list_entries: root 直下の非ディレクトリ要素とタイムスタンプの列挙
//!
//! # 設計原則
//! - root ディレクトリ以外の状態を持たない（ディレクトリが正本）
//! - リトライはしない。分類は Gateway 側で一度だけ行う

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ImageInfo;

/// Errors produced by an [`ImageStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The read target does not exist.
    #[error("no such file: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The root directory itself could not be enumerated.
    #[error("cannot list {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Classify an I/O error on `path`, keeping `NotFound` distinguishable.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Storage Engine.
///
/// Implementations must be safe to call concurrently; admission control is
/// the gateway's job, not the store's.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Create or truncate `path` and write the full payload.
    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError>;

    /// Read the whole file. Missing targets yield [`StoreError::NotFound`].
    async fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError>;

    /// Direct, non-directory children of `root` with best-effort timestamps.
    ///
    /// Per-entry metadata failures do not fail the call; the entry is returned
    /// with empty timestamps instead.
    async fn list_entries(&self, root: &Path) -> Result<Vec<ImageInfo>, StoreError>;
}
