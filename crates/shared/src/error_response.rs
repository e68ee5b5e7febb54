//! # エラーレスポンス
//!
//! ゲートウェイの全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 形式
//!
//! ```json
//! { "message": "Invalid credentials", "responseCode": 401 }
//! ```
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換はアプリ側の責務（shared に axum 依存を入れない）
//! - 認証失敗の文言は `portcullis_domain::auth::INVALID_CREDENTIALS` を唯一の定義とする

use serde::{Deserialize, Serialize};

/// 内部エラー時の汎用メッセージ
pub const INTERNAL_ERROR: &str = "Internal server error";

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message:       String,
    pub response_code: u16,
}

impl ErrorResponse {
    /// 汎用コンストラクタ
    pub fn new(message: impl Into<String>, response_code: u16) -> Self {
        Self {
            message: message.into(),
            response_code,
        }
    }

    /// 401 Unauthorized
    ///
    /// 認証系の文言はドメイン層の定数を渡す。
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message, 401)
    }

    /// 500 Internal Server Error
    ///
    /// message は固定値（内部情報を漏らさないため）。
    pub fn internal_error() -> Self {
        Self::new(INTERNAL_ERROR, 500)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_jsonシリアライズでキャメルケースのフィールド名になる() {
        let error = ErrorResponse::unauthorized("Invalid credentials");
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "message": "Invalid credentials",
                "responseCode": 401
            })
        );
        assert!(json.get("response_code").is_none());
    }

    #[test]
    fn test_unauthorizedは401を返す() {
        let error = ErrorResponse::unauthorized("Invalid credentials: Expired");

        assert_eq!(error.message, "Invalid credentials: Expired");
        assert_eq!(error.response_code, 401);
    }

    #[test]
    fn test_internal_errorは固定メッセージを返す() {
        let error = ErrorResponse::internal_error();

        assert_eq!(error.message, "Internal server error");
        assert_eq!(error.response_code, 500);
    }

    #[test]
    fn test_jsonデシリアライズが正しく動作する() {
        let json = r#"{"message":"Invalid credentials","responseCode":401}"#;
        let error: ErrorResponse = serde_json::from_str(json).unwrap();

        assert_eq!(error, ErrorResponse::unauthorized("Invalid credentials"));
    }
}
