//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! Gateway はここにある trait だけに依存し、実装の詳細（ローカル FS、
//! テスト用のメモリストア）は impls 側に隠蔽します。

pub mod image_store;
pub mod clock;

// 主要な trait を再エクスポート
pub use self::image_store::{ImageStore, StoreError};
pub use self::clock::{Clock, SystemClock, FixedClock};
