//! InMemoryImageStore - 開発用・テスト用の Storage Engine
//!
//! # 学習ポイント
//! - tokio::sync::Mutex による共有状態の保護
//! - Clock port によるタイムスタンプの差し替え
//!
//! FsImageStore と同じ契約を守る：上書きは last-writer-wins、存在しない
//! パスの read は NotFound、list は root 直下のみ。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::sync::Mutex;

use crate::domain::ImageInfo;
use crate::ports::{Clock, ImageStore, StoreError, SystemClock};

#[derive(Debug, Clone)]
struct StoredFile {
    bytes: Vec<u8>,
    created: DateTime<Local>,
    modified: DateTime<Local>,
}

/// InMemoryImageStore はパス → バイト列のマップ
///
/// # 使用例
/// ```ignore
/// let store = InMemoryImageStore::new();
/// store.write(Path::new("media/cat.jpg"), b"...").await?;
/// ```
pub struct InMemoryImageStore {
    files: Arc<Mutex<HashMap<PathBuf, StoredFile>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.files.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.lock().await.is_empty()
    }
}

impl Default for InMemoryImageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut files = self.files.lock().await;
        files
            .entry(path.to_path_buf())
            .and_modify(|f| {
                f.bytes = bytes.to_vec();
                f.modified = now;
            })
            .or_insert_with(|| StoredFile {
                bytes: bytes.to_vec(),
                created: now,
                modified: now,
            });
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        let files = self.files.lock().await;
        files
            .get(path)
            .map(|f| f.bytes.clone())
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_path_buf(),
            })
    }

    async fn list_entries(&self, root: &Path) -> Result<Vec<ImageInfo>, StoreError> {
        let files = self.files.lock().await;
        let mut entries: Vec<ImageInfo> = files
            .iter()
            .filter(|(path, _)| path.parent() == Some(root))
            .filter_map(|(path, f)| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                Some(ImageInfo::new(name, Some(f.created), Some(f.modified)))
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use chrono::TimeZone;

    #[tokio::test]
    async fn write_read_and_overwrite() {
        let store = InMemoryImageStore::new();
        let path = Path::new("media/cat.jpg");

        store.write(path, b"first").await.unwrap();
        store.write(path, b"second").await.unwrap();

        assert_eq!(store.read(path).await.unwrap(), b"second");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let store = InMemoryImageStore::new();
        let err = store.read(Path::new("media/missing")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_only_direct_children_of_root() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let store = InMemoryImageStore::with_clock(Arc::new(FixedClock::new(at)));

        store.write(Path::new("media/b.jpg"), b"1").await.unwrap();
        store.write(Path::new("media/a.png"), b"2").await.unwrap();
        store.write(Path::new("media/sub/c.jpg"), b"3").await.unwrap();
        store.write(Path::new("other/d.jpg"), b"4").await.unwrap();

        let entries = store.list_entries(Path::new("media")).await.unwrap();
        assert_eq!(
            entries,
            vec![
                ImageInfo::new("a.png", Some(at), Some(at)),
                ImageInfo::new("b.jpg", Some(at), Some(at)),
            ]
        );
    }
}
