//! # ヘルスチェック共通型
//!
//! ゲートウェイのヘルスチェックエンドポイントで使用されるレスポンス型を提供する。
//!
//! - `/health`: Liveness（[`HealthResponse`]）
//! - `/health/services`: 背後のサービス群の集約結果（[`ServicesHealthResponse`]）

use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// `status` はゲートウェイ自体の稼働状態、`version` は Cargo.toml のバージョンを示す。
///
/// ## 使用例
///
/// ```
/// use portcullis_shared::HealthResponse;
///
/// let response = HealthResponse {
///     status:  "healthy".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(response.status, "healthy");
/// ```
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 稼働状態（`"healthy"` または `"unhealthy"`）
    pub status:  String,
    /// アプリケーションバージョン（Cargo.toml から取得）
    pub version: String,
}

/// 個別サービスのステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Up,
    Down,
}

/// 集約結果全体のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    /// 全サービスが稼働中
    Ready,
    /// 一部のサービスが停止中
    NotReady,
}

/// 個別サービスのヘルス情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealthEntry {
    pub name:   String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
}

/// サービス群のヘルスチェックレスポンス
///
/// `services` は登録順に並ぶ。停止中のサービスがあってもリクエスト自体は成功として扱う。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesHealthResponse {
    pub status:   ReadinessStatus,
    pub services: Vec<ServiceHealthEntry>,
}

impl ServicesHealthResponse {
    /// 個別結果から全体ステータスを導出してレスポンスを組み立てる
    pub fn from_entries(services: Vec<ServiceHealthEntry>) -> Self {
        let status = if services.iter().all(|s| s.status == CheckStatus::Up) {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        };
        Self { status, services }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(name: &str, status: CheckStatus, detail: Option<&str>) -> ServiceHealthEntry {
        ServiceHealthEntry {
            name: name.to_string(),
            status,
            detail: detail.map(str::to_string),
        }
    }

    #[test]
    fn test_health_responseのserializeで正しいjson形状にする() {
        let response = HealthResponse {
            status:  "healthy".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "healthy",
                "version": "0.1.0"
            })
        );
    }

    #[test]
    fn test_全サービスupならready() {
        let response = ServicesHealthResponse::from_entries(vec![
            entry("users", CheckStatus::Up, None),
            entry("orders", CheckStatus::Up, None),
        ]);

        assert_eq!(response.status, ReadinessStatus::Ready);
    }

    #[test]
    fn test_1つでもdownならnot_ready() {
        let response = ServicesHealthResponse::from_entries(vec![
            entry("users", CheckStatus::Up, None),
            entry("orders", CheckStatus::Down, Some("timed out")),
        ]);

        assert_eq!(response.status, ReadinessStatus::NotReady);
    }

    #[test]
    fn test_detailがnoneのときはフィールドを出力しない() {
        let response = ServicesHealthResponse::from_entries(vec![
            entry("users", CheckStatus::Up, None),
            entry("orders", CheckStatus::Down, Some("HTTP 503")),
        ]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "not_ready",
                "services": [
                    { "name": "users", "status": "up" },
                    { "name": "orders", "status": "down", "detail": "HTTP 503" }
                ]
            })
        );
    }
}
