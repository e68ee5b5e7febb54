//! # ゲートウェイサーバー
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `GATEWAY_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `GATEWAY_PORT` | No | ポート番号（デフォルト: `8080`） |
//! | `GATEWAY_MASTER_KEY` | **Yes** | マスター API キー |
//! | `GATEWAY_TOKEN_SECRET` | **Yes** | トークン署名鍵 |
//! | `GATEWAY_TOKEN_ISSUER` | No | `iss` クレーム（デフォルト: `portcullis`） |
//! | `GATEWAY_TOKEN_TTL_SECS` | No | トークン有効期間（デフォルト: `3600`） |
//! | `GATEWAY_DIRECTORY_TIMEOUT_MS` | No | ユーザー検索のタイムアウト（デフォルト: `3000`） |
//! | `GATEWAY_USERS_FILE` | No | ユーザー定義ファイル（JSON） |
//! | `GATEWAY_PROBE_TIMEOUT_MS` | No | プローブごとのタイムアウト（デフォルト: `5000`） |
//! | `GATEWAY_HEALTH_TARGETS` | No | `name=url,name=url` 形式のヘルスチェック対象 |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! GATEWAY_MASTER_KEY=... GATEWAY_TOKEN_SECRET=... cargo run -p portcullis-gateway
//! ```

use std::net::SocketAddr;

use portcullis_gateway::{app, config::GatewayConfig};
use portcullis_shared::observability::{TracingConfig, init_tracing, service_span};
use tokio::{net::TcpListener, runtime::Handle};

/// ゲートウェイサーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("gateway");
    init_tracing(&tracing_config);
    let _tracing_guard = service_span(&tracing_config).entered();

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        targets = config.health_targets.len(),
        "ゲートウェイを起動します: {}:{}",
        config.host,
        config.port
    );

    let app = app::build(&config, Handle::current())?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("ゲートウェイが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
