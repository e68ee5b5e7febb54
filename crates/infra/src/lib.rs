//! # Portcullis インフラ層
//!
//! 外部システムとの接続と、署名・パスワード検証などの実装を担当する。
//!
//! ## 責務
//!
//! - **トークン**: HS256 署名付きトークンの発行と検証（[`token`]）
//! - **パスワード検証**: Argon2id ハッシュによる検証（[`password`]）
//! - **ユーザーディレクトリ**: ユーザー名からのユーザー検索（[`user_directory`]）
//! - **ヘルスプローブ**: バックエンドごとの稼働確認（[`health_probe`]）
//!
//! ## 依存関係
//!
//! ```text
//! gateway → infra → domain
//! ```
//!
//! 各機能はトレイトと実装の組で提供し、ゲートウェイ側のテストではスタブに差し替える。

pub mod error;
pub mod health_probe;
pub mod password;
pub mod token;
pub mod user_directory;

pub use error::{InfraError, InfraErrorKind};
pub use health_probe::{HealthProbe, HttpHealthProbe};
pub use password::Argon2PasswordVerifier;
pub use token::{AccessToken, JwtTokenCodec, TokenCodec, TokenSettings};
pub use user_directory::{StaticUserDirectory, UserDirectory, UserRecord};
