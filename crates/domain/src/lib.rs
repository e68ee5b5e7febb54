//! # Portcullis ドメイン層
//!
//! 認証ゲートウェイの中核となる値と結果型を定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! gateway → infra → domain
//!     ↘       ↘
//!       shared
//! ```
//!
//! ドメイン層は外部システム（ユーザーディレクトリ、バックエンド）に依存しない。
//! 外部との接続はインフラ層がトレイト実装として提供する。
//!
//! ## モジュール構成
//!
//! - [`auth`] - 認証結果（[`AuthOutcome`](auth::AuthOutcome)）と失敗種別
//! - [`claims`] - トークンに埋め込むクレーム
//! - [`clock`] - 時刻プロバイダ
//! - [`credential`] - リクエストヘッダから取り出す認証情報
//! - [`health`] - バックエンドのヘルス情報
//! - [`password`] - パスワード関連の値オブジェクト
//! - [`user`] - ユーザーディレクトリが返すユーザー

pub mod auth;
pub mod claims;
pub mod clock;
pub mod credential;
pub mod health;
pub mod password;
pub mod user;
