//! GatewayBuilder - Gateway の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 開発体験の改善（明確なエラーメッセージ）

use std::path::PathBuf;
use std::sync::Arc;

use crate::admission::AdmissionGate;
use crate::app::gateway::ImageGateway;
use crate::config::GatewayConfig;
use crate::impls::FsImageStore;
use crate::paths::PathResolver;
use crate::ports::ImageStore;

/// GatewayBuilder は ImageGateway を構築
///
/// # 使用例
/// ```ignore
/// let gateway = GatewayBuilder::from_config(GatewayConfig::default())
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - build() 時に上限値・拡張子・root ディレクトリを検証
/// - 不正なら BuildError を返す（panic しない）
pub struct GatewayBuilder {
    config: GatewayConfig,
    store: Option<Arc<dyn ImageStore>>,
    require_root: bool,
}

/// BuildError は Gateway 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("{0} concurrency limit must be at least 1")]
    ZeroLimit(&'static str),

    #[error("file extension must not be empty")]
    EmptyExtension,

    #[error("file extension '{0}' must not start with '.'")]
    DottedExtension(String),

    #[error("storage root {} does not exist or is not accessible: {source}", path.display())]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage root {} is not a directory", .0.display())]
    RootNotDirectory(PathBuf),
}

impl GatewayBuilder {
    /// 新しい GatewayBuilder を作成（デフォルト設定）
    pub fn new() -> Self {
        Self::from_config(GatewayConfig::default())
    }

    pub fn from_config(config: GatewayConfig) -> Self {
        Self {
            config,
            store: None,
            require_root: true,
        }
    }

    pub fn upload_read_limit(mut self, limit: usize) -> Self {
        self.config.upload_read_limit = limit;
        self
    }

    pub fn list_limit(mut self, limit: usize) -> Self {
        self.config.list_limit = limit;
        self
    }

    pub fn root_dir(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root_dir = root.into();
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.config.extension = extension.into();
        self
    }

    /// Storage Engine を差し替える（デフォルトは FsImageStore）
    pub fn store(mut self, store: Arc<dyn ImageStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// root ディレクトリの存在チェックを行うか（InMemory ストアでは不要）
    pub fn require_existing_root(mut self, require: bool) -> Self {
        self.require_root = require;
        self
    }

    /// GatewayBuilder を構築して ImageGateway を生成
    ///
    /// # 検証
    /// - 上限値が 1 以上
    /// - 拡張子が空でなく、先頭が '.' でない
    /// - root が存在するディレクトリ（require_existing_root の場合）
    pub fn build(self) -> Result<ImageGateway, BuildError> {
        let cfg = self.config;
        if cfg.upload_read_limit == 0 {
            return Err(BuildError::ZeroLimit("upload/read"));
        }
        if cfg.list_limit == 0 {
            return Err(BuildError::ZeroLimit("list"));
        }
        if cfg.extension.is_empty() {
            return Err(BuildError::EmptyExtension);
        }
        if cfg.extension.starts_with('.') {
            return Err(BuildError::DottedExtension(cfg.extension));
        }
        if self.require_root {
            let meta = std::fs::metadata(&cfg.root_dir).map_err(|e| BuildError::RootUnavailable {
                path: cfg.root_dir.clone(),
                source: e,
            })?;
            if !meta.is_dir() {
                return Err(BuildError::RootNotDirectory(cfg.root_dir));
            }
        }

        let gate = AdmissionGate::new(cfg.upload_read_limit, cfg.list_limit);
        let resolver = PathResolver::new(cfg.root_dir, cfg.extension);
        let store = self.store.unwrap_or_else(|| Arc::new(FsImageStore::new()));
        Ok(ImageGateway::new(Arc::new(gate), resolver, store))
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
