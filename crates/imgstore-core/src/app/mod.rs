//! App - アプリケーション層
//!
//! このモジュールは、ports と admission を組み合わせて Gateway を実装します。
//!
//! # 主要コンポーネント
//! - **GatewayBuilder**: 設定の検証とワイヤリング
//! - **ImageGateway**: upload / list_images / get_image
//! - **GatewayStatus**: admission 予算のスナップショット

pub mod builder;
pub mod gateway;
pub mod status;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, GatewayBuilder};
pub use self::gateway::ImageGateway;
pub use self::status::{BudgetStatus, GatewayStatus};
