//! ImageGateway - admission 制御付きのストレージゲートウェイ
//!
//! # フロー（各操作共通）
//! 1. 操作クラスの gate から permit を取得（キャンセル可能）
//! 2. PathResolver でパスを決定
//! 3. ImageStore を呼ぶ
//! 4. permit を解放（Drop、どの経路でも必ず）
//! 5. StoreError を GatewayError に一度だけ分類（リトライなし）

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::admission::{AdmissionError, AdmissionGate, AdmissionPermit, OperationClass};
use crate::app::status::GatewayStatus;
use crate::domain::{GatewayError, ImageInfo};
use crate::paths::PathResolver;
use crate::ports::ImageStore;

/// Entry point for the three image operations.
///
/// Cheap to clone; clones share the same admission budgets and store.
#[derive(Clone)]
pub struct ImageGateway {
    gate: Arc<AdmissionGate>,
    resolver: PathResolver,
    store: Arc<dyn ImageStore>,
}

impl ImageGateway {
    pub fn new(gate: Arc<AdmissionGate>, resolver: PathResolver, store: Arc<dyn ImageStore>) -> Self {
        Self {
            gate,
            resolver,
            store,
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn status(&self) -> GatewayStatus {
        GatewayStatus::snapshot(&self.gate)
    }

    async fn admit(
        &self,
        class: OperationClass,
        cancel: &CancellationToken,
    ) -> Result<AdmissionPermit, GatewayError> {
        debug!(%class, available = self.gate.available(class), "waiting for admission");
        self.gate.acquire(class, cancel).await.map_err(|e| match e {
            AdmissionError::Cancelled(_) => {
                debug!(%class, "admission wait cancelled");
                GatewayError::Cancelled
            }
            AdmissionError::Closed(_) => GatewayError::internal("admission gate unavailable", e),
        })
    }

    /// Store `bytes` as `<identifier>.<extension>` and return that file name.
    ///
    /// An existing artifact with the same name is overwritten.
    pub async fn upload(
        &self,
        identifier: &str,
        bytes: &[u8],
        cancel: &CancellationToken,
    ) -> Result<String, GatewayError> {
        info!(identifier, size = bytes.len(), "upload image request");
        let _permit = self.admit(OperationClass::UploadOrRead, cancel).await?;

        let file_name = self.resolver.file_name(identifier);
        let path = self.resolver.resolve(identifier);
        self.store.write(&path, bytes).await.map_err(|e| {
            error!(identifier, error = %e, "saving image failed");
            GatewayError::internal("error saving image", e)
        })?;
        Ok(file_name)
    }

    /// Every non-directory entry of the storage root.
    pub async fn list_images(&self, cancel: &CancellationToken) -> Result<Vec<ImageInfo>, GatewayError> {
        info!("get image list request");
        let _permit = self.admit(OperationClass::List, cancel).await?;

        self.store
            .list_entries(self.resolver.root())
            .await
            .map_err(|e| {
                error!(error = %e, "listing images failed");
                GatewayError::internal("error reading image list", e)
            })
    }

    /// Bytes of `root/<name>`.
    ///
    /// The extension is NOT appended here: pass the file name returned by
    /// [`upload`](Self::upload), e.g. `cat.jpg`.
    pub async fn get_image(&self, name: &str, cancel: &CancellationToken) -> Result<Vec<u8>, GatewayError> {
        info!(name, "get single image data request");
        let _permit = self.admit(OperationClass::UploadOrRead, cancel).await?;

        let path = self.resolver.resolve_raw(name);
        match self.store.read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.is_not_found() => {
                warn!(name, "image not found");
                Err(GatewayError::NotFound(name.to_string()))
            }
            Err(e) => {
                error!(name, error = %e, "reading image failed");
                Err(GatewayError::internal("error reading image", e))
            }
        }
    }
}
