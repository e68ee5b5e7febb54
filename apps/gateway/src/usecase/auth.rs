//! # 認証ユースケース
//!
//! 認証情報の解決とトークンの発行・検証を行う。
//!
//! ## 解決手順
//!
//! 1. マスターキーヘッダがあれば設定値と定数時間で比較する。
//!    一致しなければ Authorization ヘッダがあっても拒否する
//! 2. Authorization ヘッダが Basic なら、ユーザーディレクトリで検索しパスワードを検証する。
//!    ユーザーが存在しない場合もダミーの検証器でパスワード検証を 1 回行う（タイミング攻撃対策）
//! 3. どちらもなければ `ResolutionError::MissingCredentials`
//!
//! ユーザーディレクトリの問い合わせは注入されたランタイム上のタスクとして実行し、
//! 設定されたタイムアウトで打ち切る。

use std::{sync::Arc, time::Duration};

use portcullis_domain::{
    auth::{AuthOutcome, ResolutionError},
    claims::{IdentityClaims, MASTER_USERNAME, VerifiedClaims},
    credential::Credential,
    password::{PasswordVerifier, PlainPassword},
    user::User,
};
use portcullis_infra::{AccessToken, TokenCodec, UserDirectory};
use subtle::ConstantTimeEq;
use tokio::runtime::Handle;

use crate::error::GatewayError;

/// 認証情報リゾルバ
pub struct CredentialResolver {
    master_key:        String,
    directory:         Arc<dyn UserDirectory>,
    directory_timeout: Duration,
    handle:            Handle,
    dummy_verifier:    Arc<dyn PasswordVerifier>,
}

impl CredentialResolver {
    pub fn new(
        master_key: impl Into<String>,
        directory: Arc<dyn UserDirectory>,
        directory_timeout: Duration,
        handle: Handle,
        dummy_verifier: Arc<dyn PasswordVerifier>,
    ) -> Self {
        Self {
            master_key: master_key.into(),
            directory,
            directory_timeout,
            handle,
            dummy_verifier,
        }
    }

    /// リクエストヘッダから認証結果を決定する
    #[tracing::instrument(skip_all)]
    pub async fn resolve(&self, master_key: Option<&str>, authorization: Option<&str>) -> AuthOutcome {
        match Credential::from_headers(master_key, authorization) {
            Some(Credential::MasterKey(candidate)) => self.resolve_master_key(&candidate),
            Some(Credential::BasicAuth { username, password }) => {
                self.resolve_basic(username, &password).await
            }
            Some(Credential::BearerToken { .. }) | None => {
                tracing::debug!("利用可能な認証情報がありません");
                AuthOutcome::resolution_error(ResolutionError::MissingCredentials)
            }
        }
    }

    fn resolve_master_key(&self, candidate: &str) -> AuthOutcome {
        let matched: bool = candidate
            .as_bytes()
            .ct_eq(self.master_key.as_bytes())
            .into();

        if matched {
            tracing::info!(username = MASTER_USERNAME, "マスターキーで認証しました");
            AuthOutcome::authenticated(IdentityClaims::for_username(MASTER_USERNAME))
        } else {
            tracing::info!("マスターキーが一致しません");
            AuthOutcome::rejected()
        }
    }

    async fn resolve_basic(&self, username: String, password: &PlainPassword) -> AuthOutcome {
        let user = match self.find_user(username.clone()).await {
            Ok(user) => user,
            Err(cause) => return AuthOutcome::resolution_error(cause),
        };

        match user {
            Some(user) if user.authenticate(password) => {
                tracing::info!(username = %username, "Basic 認証に成功しました");
                AuthOutcome::authenticated(user.identity_claims())
            }
            Some(_) => {
                tracing::info!(username = %username, "パスワードが一致しません");
                AuthOutcome::rejected()
            }
            None => {
                // 結果は常に不一致。実在ユーザーと処理時間を揃える
                let _ = self.dummy_verifier.authenticate(password);
                tracing::info!(username = %username, "ユーザーが見つかりません");
                AuthOutcome::rejected()
            }
        }
    }

    async fn find_user(&self, username: String) -> Result<Option<User>, ResolutionError> {
        let directory = Arc::clone(&self.directory);
        let task = self
            .handle
            .spawn(async move { directory.find_by_username(&username).await });
        let abort_handle = task.abort_handle();

        match tokio::time::timeout(self.directory_timeout, task).await {
            Ok(Ok(Ok(user))) => Ok(user),
            Ok(Ok(Err(e))) => Err(ResolutionError::DirectoryUnavailable(e.to_string())),
            Ok(Err(join_error)) => Err(ResolutionError::DirectoryUnavailable(join_error.to_string())),
            Err(_) => {
                abort_handle.abort();
                Err(ResolutionError::DirectoryTimeout)
            }
        }
    }
}

/// 認証ユースケースの実装
pub struct AuthUseCaseImpl {
    resolver: CredentialResolver,
    codec:    Arc<dyn TokenCodec>,
}

impl AuthUseCaseImpl {
    pub fn new(resolver: CredentialResolver, codec: Arc<dyn TokenCodec>) -> Self {
        Self { resolver, codec }
    }

    /// 認証情報を検証し、成功した場合にトークンを発行する
    ///
    /// トークンは [`AuthOutcome::Authenticated`] からのみ発行する。
    pub async fn authenticate(
        &self,
        master_key: Option<&str>,
        authorization: Option<&str>,
    ) -> Result<AccessToken, GatewayError> {
        match self.resolver.resolve(master_key, authorization).await {
            AuthOutcome::Authenticated { identity_claims } => Ok(self.codec.issue(&identity_claims)),
            AuthOutcome::Rejected { .. } => Err(GatewayError::AuthenticationFailed),
            AuthOutcome::ResolutionError { cause } => Err(GatewayError::Resolution(cause)),
        }
    }

    /// Bearer トークンを検証する
    pub fn verify_token(&self, authorization: Option<&str>) -> Result<VerifiedClaims, GatewayError> {
        let token = Credential::bearer_token(authorization).ok_or(GatewayError::MissingToken)?;
        let claims = self.codec.verify(&token).inspect_err(|e| {
            tracing::info!(kind = e.kind(), "トークン検証に失敗しました");
        })?;
        Ok(claims)
    }
}
