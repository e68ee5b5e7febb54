//! # ヘルスチェックハンドラ
//!
//! - `/health`: Liveness Check（常に `"healthy"` を返す）
//! - `/health/services`: 背後のバックエンド群の稼働状態（常に 200 を返す）
//!
//! レスポンス型は [`portcullis_shared::HealthResponse`] / [`portcullis_shared::ServicesHealthResponse`] を参照。

use std::sync::Arc;

use axum::{Json, extract::State};
use portcullis_domain::health::{HealthStatus, ServiceHealth};
use portcullis_infra::HealthProbe;
use portcullis_shared::{CheckStatus, HealthResponse, ServiceHealthEntry, ServicesHealthResponse};

use crate::usecase::HealthAggregator;

/// ゲートウェイのヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// ヘルス集約用の State
pub struct HealthState {
    pub aggregator: HealthAggregator,
    /// 登録順のプローブ
    pub probes:     Vec<Arc<dyn HealthProbe>>,
}

/// バックエンド群のヘルスチェックエンドポイント
///
/// 停止中のバックエンドがあってもリクエスト自体は成功として 200 を返す。
/// 全体の `status` は全件稼働中なら `ready`、それ以外は `not_ready`。
#[tracing::instrument(skip_all)]
pub async fn services_health(State(state): State<Arc<HealthState>>) -> Json<ServicesHealthResponse> {
    let report = state.aggregator.check(&state.probes).await;

    let entries = report.into_entries().into_iter().map(to_entry).collect();
    Json(ServicesHealthResponse::from_entries(entries))
}

fn to_entry(health: ServiceHealth) -> ServiceHealthEntry {
    ServiceHealthEntry {
        name:   health.service_name,
        status: match health.status {
            HealthStatus::Up => CheckStatus::Up,
            HealthStatus::Down => CheckStatus::Down,
        },
        detail: health.detail,
    }
}
