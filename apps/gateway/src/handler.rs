//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラはヘッダの取り出しとレスポンス整形のみを行い、判定はユースケース層に委譲する
//!
//! ## ハンドラ一覧
//!
//! - `auth`: トークン発行・検証
//! - `health`: ゲートウェイ自身とバックエンド群のヘルスチェック

pub mod auth;
pub mod health;

pub use auth::{AuthState, TokenResponse, authenticate, verify};
pub use health::{HealthState, health_check, services_health};
