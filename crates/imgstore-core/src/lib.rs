//! imgstore-core
//!
//! Admission-controlled storage gateway for an image store.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ImageInfo, ErrorKind, GatewayError）
//! - **ports**: 抽象化レイヤー（ImageStore, Clock）
//! - **impls**: 実装（FsImageStore, InMemoryImageStore）
//! - **admission**: 操作クラスごとの同時実行数制限
//! - **paths**: identifier → ファイルパスの解決
//! - **app**: GatewayBuilder, ImageGateway, GatewayStatus
//! - **config**: GatewayConfig

pub mod domain;
pub mod ports;
pub mod impls;
pub mod admission;
pub mod paths;
pub mod app;
pub mod config;

pub use crate::admission::{AdmissionGate, OperationClass};
pub use crate::app::{BuildError, GatewayBuilder, GatewayStatus, ImageGateway};
pub use crate::config::GatewayConfig;
pub use crate::domain::{ErrorKind, GatewayError, ImageInfo};
pub use crate::paths::PathResolver;
