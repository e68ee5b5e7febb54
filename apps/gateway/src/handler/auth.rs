//! # 認証ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /auth` - `X-Api-Key` または `Authorization: Basic` でトークンを発行
//! - `POST /auth/verify` - `Authorization: Bearer` のトークンを検証しクレームを返す

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
};
use portcullis_domain::credential::MASTER_KEY_HEADER;
use serde::Serialize;

use crate::{error::GatewayError, usecase::AuthUseCase};

/// 認証ハンドラの共有状態
pub struct AuthState {
    pub usecase: Arc<dyn AuthUseCase>,
}

/// トークン発行レスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token_type:   &'static str,
    pub access_token: String,
}

/// マスターキーヘッダを取り出す
///
/// 値が文字列として読めない場合も「ヘッダあり」として扱い、照合で失敗させる。
fn master_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(MASTER_KEY_HEADER)
        .map(|v| v.to_str().unwrap_or_default())
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// POST /auth
#[tracing::instrument(skip_all)]
pub async fn authenticate(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, GatewayError> {
    let token = state
        .usecase
        .authenticate(master_key(&headers), authorization(&headers))
        .await?;

    Ok(Json(TokenResponse {
        token_type:   "Bearer",
        access_token: token.into_string(),
    }))
}

/// POST /auth/verify
///
/// 値が空のクレームはレスポンスに含めない。
#[tracing::instrument(skip_all)]
pub async fn verify(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<Json<BTreeMap<String, String>>, GatewayError> {
    let claims = state.usecase.verify_token(authorization(&headers))?;
    Ok(Json(claims.into_public_map()))
}
