//! # アプリケーション組み立て
//!
//! 設定から依存コンポーネントを初期化し、ルーターを構築する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use portcullis_domain::clock::SystemClock;
use portcullis_infra::{
    Argon2PasswordVerifier,
    HealthProbe,
    HttpHealthProbe,
    InfraError,
    JwtTokenCodec,
    StaticUserDirectory,
    TokenSettings,
    UserDirectory,
};
use portcullis_shared::{canonical_log::CanonicalLogLineLayer, observability::make_request_span};
use tokio::runtime::Handle;
use tower_http::trace::TraceLayer;

use crate::{
    config::GatewayConfig,
    handler::{AuthState, HealthState, authenticate, health_check, services_health, verify},
    usecase::{AuthUseCaseImpl, CredentialResolver, HealthAggregator},
};

/// ルーターを構築する
///
/// トレーシング用のレイヤーを含む。
pub fn router(auth_state: Arc<AuthState>, health_state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/services", get(services_health))
                .with_state(health_state),
        )
        .route("/auth", post(authenticate))
        .route("/auth/verify", post(verify))
        .with_state(auth_state)
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
}

/// 設定から依存コンポーネントを初期化し、ルーターを構築する
///
/// ユーザーディレクトリとプローブのタスクは `handle` 上で実行する。
///
/// # Errors
///
/// - ユーザー定義ファイルの読み込みに失敗した場合
pub fn build(config: &GatewayConfig, handle: Handle) -> Result<Router, InfraError> {
    let directory: Arc<dyn UserDirectory> = match &config.users_file {
        Some(path) => Arc::new(StaticUserDirectory::from_json_file(path)?),
        None => {
            tracing::warn!("GATEWAY_USERS_FILE が未設定のため、Basic 認証は常に失敗します");
            Arc::new(StaticUserDirectory::default())
        }
    };

    let codec = Arc::new(JwtTokenCodec::new(
        TokenSettings {
            secret: config.token_secret.clone(),
            issuer: config.token_issuer.clone(),
            ttl:    config.token_ttl,
        },
        Arc::new(SystemClock),
    ));
    let resolver = CredentialResolver::new(
        config.master_key.clone(),
        directory,
        config.directory_timeout,
        handle.clone(),
        Arc::new(Argon2PasswordVerifier::dummy()),
    );
    let auth_state = Arc::new(AuthState {
        usecase: Arc::new(AuthUseCaseImpl::new(resolver, codec)),
    });

    let http_client = reqwest::Client::new();
    let probes = config
        .health_targets
        .iter()
        .map(|target| {
            Arc::new(HttpHealthProbe::new(&target.name, &target.url, http_client.clone()))
                as Arc<dyn HealthProbe>
        })
        .collect();
    let health_state = Arc::new(HealthState {
        aggregator: HealthAggregator::new(handle, config.probe_timeout),
        probes,
    });

    Ok(router(auth_state, health_state))
}
