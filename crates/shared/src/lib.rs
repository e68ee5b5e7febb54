//! # Portcullis 共有ユーティリティ
//!
//! ゲートウェイ全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, gateway）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum への依存は持たない（HTTP レスポンス変換は各アプリの責務）

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::{
    CheckStatus,
    HealthResponse,
    ReadinessStatus,
    ServiceHealthEntry,
    ServicesHealthResponse,
};
