//! # Portcullis ゲートウェイ
//!
//! 背後のサービス群の前段に立ち、認証情報の検証とトークン発行、
//! およびサービス群のヘルス集約を行う HTTP サーバー。
//!
//! ## エンドポイント
//!
//! | メソッド | パス | 説明 |
//! |----------|------|------|
//! | POST | `/auth` | マスターキーまたは Basic 認証でトークンを発行 |
//! | POST | `/auth/verify` | Bearer トークンを検証しクレームを返す |
//! | GET | `/health` | Liveness Check |
//! | GET | `/health/services` | バックエンド群のヘルス集約 |
//!
//! ## 依存関係
//!
//! ```text
//! handler → usecase → infra (UserDirectory, TokenCodec, HealthProbe) → domain
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
