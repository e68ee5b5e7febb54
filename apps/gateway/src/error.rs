//! # ゲートウェイエラー定義
//!
//! ゲートウェイ固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | エラー | HTTP | message |
//! |--------|------|---------|
//! | 認証拒否 | 401 | `Invalid credentials` |
//! | トークン不正・欠落 | 401 | `Invalid credentials: <種別>` |
//! | 認証情報なし | 500 | `Authorization header required`（responseCode は 401） |
//! | 依存先の障害 | 500 | `Internal server error` |
//!
//! 依存先の障害の詳細はログにのみ出力し、レスポンスには含めない。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portcullis_domain::auth::{INVALID_CREDENTIALS, ResolutionError, TokenError};
use portcullis_shared::ErrorResponse;
use thiserror::Error;

/// Bearer トークンが見つからない場合の種別名
const MISSING_TOKEN: &str = "MissingToken";

/// ゲートウェイで発生するエラー
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 認証情報が正しくない
    #[error("認証に失敗しました")]
    AuthenticationFailed,

    /// Bearer トークンがない
    #[error("Bearer トークンがありません")]
    MissingToken,

    /// トークン検証に失敗した
    #[error("トークン検証に失敗しました: {0}")]
    InvalidToken(#[from] TokenError),

    /// 認証情報を解決できなかった
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            GatewayError::AuthenticationFailed => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::unauthorized(INVALID_CREDENTIALS),
            ),
            GatewayError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::unauthorized(format!("{INVALID_CREDENTIALS}: {MISSING_TOKEN}")),
            ),
            GatewayError::InvalidToken(e) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::unauthorized(format!("{INVALID_CREDENTIALS}: {}", e.kind())),
            ),
            GatewayError::Resolution(cause) if cause.is_dependency_failure() => {
                tracing::error!(error = %cause, "認証情報の解決に失敗しました");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal_error())
            }
            GatewayError::Resolution(cause) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(cause.to_string(), StatusCode::UNAUTHORIZED.as_u16()),
            ),
        };

        (status, Json(body)).into_response()
    }
}
