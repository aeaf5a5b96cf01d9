//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **FsImageStore**: 本番用のローカルファイルシステム
//! - **InMemoryImageStore**: 開発用・テスト用

pub mod fs_store;
pub mod inmem_store;

// 主要な型を再エクスポート
pub use self::fs_store::FsImageStore;
pub use self::inmem_store::InMemoryImageStore;
