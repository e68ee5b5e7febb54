//! # ユースケース層
//!
//! ゲートウェイのビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: ハンドラのテストでスタブに差し替えられるようトレイトを定義
//! - **依存性注入**: ユーザーディレクトリ、トークンコーデック、実行ランタイムを外部から注入
//! - **薄いハンドラ**: ハンドラはヘッダの取り出しとレスポンス整形のみを行う

pub mod auth;
pub mod health;

use async_trait::async_trait;
pub use auth::{AuthUseCaseImpl, CredentialResolver};
pub use health::HealthAggregator;
use portcullis_domain::claims::VerifiedClaims;
use portcullis_infra::AccessToken;

use crate::error::GatewayError;

/// 認証ユースケーストレイト
#[async_trait]
pub trait AuthUseCase: Send + Sync {
    /// 認証情報を検証し、成功した場合にトークンを発行する
    ///
    /// ## 引数
    ///
    /// - `master_key`: `X-Api-Key` ヘッダの値
    /// - `authorization`: `Authorization` ヘッダの値
    async fn authenticate(
        &self,
        master_key: Option<&str>,
        authorization: Option<&str>,
    ) -> Result<AccessToken, GatewayError>;

    /// Bearer トークンを検証し、クレームを返す
    fn verify_token(&self, authorization: Option<&str>) -> Result<VerifiedClaims, GatewayError>;
}

#[async_trait]
impl AuthUseCase for AuthUseCaseImpl {
    async fn authenticate(
        &self,
        master_key: Option<&str>,
        authorization: Option<&str>,
    ) -> Result<AccessToken, GatewayError> {
        self.authenticate(master_key, authorization).await
    }

    fn verify_token(&self, authorization: Option<&str>) -> Result<VerifiedClaims, GatewayError> {
        self.verify_token(authorization)
    }
}
