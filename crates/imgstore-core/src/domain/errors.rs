//! Errors - エラー型と分類
//!
//! Gateway が transport 層に返すエラーと、その運用分類（ErrorKind）を定義します。
//!
//! # 分類
//! - Cancelled: gate 待ちが呼び出し側のキャンセルで中断された
//! - NotFound: 取得対象が存在しない（読み出し経路のみ）
//! - Internal: それ以外の I/O 失敗すべて

use thiserror::Error;

/// ErrorKind はエラーの分類（wire 上のステータスに対応）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Cancelled,
    NotFound,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// GatewayError は Gateway の各操作が返すエラー
///
/// Storage Engine のエラーは一度だけ分類され、リトライはしない。
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request cancelled while waiting for an admission slot")]
    Cancelled,

    #[error("image {0} not found")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Cancelled => ErrorKind::Cancelled,
            GatewayError::NotFound(_) => ErrorKind::NotFound,
            GatewayError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        GatewayError::Internal(format!("{context}: {err}"))
    }
}
