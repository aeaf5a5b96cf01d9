//! Admission - 操作クラスごとの同時実行数制限
//!
//! 2 つの独立したセマフォを持つ：
//! - UploadOrRead: upload と単一画像の read が同じ予算を共有（小さい）
//! - List: 一覧取得専用（大きい）
//!
//! # 設計原則
//! - acquire は呼び出し側の CancellationToken で中断できる。中断時は容量を消費しない
//! - release は AdmissionPermit の Drop で必ず一度だけ行われる（どの終了経路でも）
//! - 公平性はセマフォ任せ（tokio の Semaphore は FIFO）

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Operation class that selects the budget a request draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationClass {
    UploadOrRead,
    List,
}

impl fmt::Display for OperationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationClass::UploadOrRead => f.write_str("upload_or_read"),
            OperationClass::List => f.write_str("list"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("admission wait cancelled for class {0}")]
    Cancelled(OperationClass),

    #[error("admission gate for class {0} is closed")]
    Closed(OperationClass),
}

/// A unit of capacity held for the duration of one operation.
///
/// Dropping the permit returns the unit to its class budget.
#[derive(Debug)]
pub struct AdmissionPermit {
    class: OperationClass,
    _permit: OwnedSemaphorePermit,
}

impl AdmissionPermit {
    pub fn class(&self) -> OperationClass {
        self.class
    }
}

#[derive(Debug)]
struct Budget {
    capacity: usize,
    semaphore: Arc<Semaphore>,
}

impl Budget {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
        }
    }
}

/// AdmissionGate は 2 つの独立した予算を管理
///
/// # 使用例
/// ```ignore
/// let gate = AdmissionGate::new(10, 100);
/// let permit = gate.acquire(OperationClass::UploadOrRead, &cancel).await?;
/// // ... I/O ...
/// drop(permit);
/// ```
#[derive(Debug)]
pub struct AdmissionGate {
    upload_or_read: Budget,
    list: Budget,
}

impl AdmissionGate {
    /// Capacities are fixed for the lifetime of the gate.
    pub fn new(upload_or_read_capacity: usize, list_capacity: usize) -> Self {
        Self {
            upload_or_read: Budget::new(upload_or_read_capacity),
            list: Budget::new(list_capacity),
        }
    }

    fn budget(&self, class: OperationClass) -> &Budget {
        match class {
            OperationClass::UploadOrRead => &self.upload_or_read,
            OperationClass::List => &self.list,
        }
    }

    /// Wait for one unit of `class` capacity.
    ///
    /// Returns [`AdmissionError::Cancelled`] if `cancel` fires first. A token
    /// that is already cancelled fails even when capacity is free.
    pub async fn acquire(
        &self,
        class: OperationClass,
        cancel: &CancellationToken,
    ) -> Result<AdmissionPermit, AdmissionError> {
        let semaphore = Arc::clone(&self.budget(class).semaphore);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AdmissionError::Cancelled(class)),
            permit = semaphore.acquire_owned() => match permit {
                Ok(permit) => Ok(AdmissionPermit { class, _permit: permit }),
                Err(_) => Err(AdmissionError::Closed(class)),
            },
        }
    }

    pub fn capacity(&self, class: OperationClass) -> usize {
        self.budget(class).capacity
    }

    /// Units currently free. Racy by nature; for observability only.
    pub fn available(&self, class: OperationClass) -> usize {
        self.budget(class).semaphore.available_permits()
    }
}
