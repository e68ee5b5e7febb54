//! # オブザーバビリティ
//!
//! ログ出力の設定とトレーシングの初期化をまとめる。
//!
//! | 環境変数 | 値 | 既定 |
//! |----------|----|------|
//! | `LOG_FORMAT` | `json` / `pretty` | `pretty` |
//! | `RUST_LOG` | EnvFilter のディレクティブ | `info,portcullis=debug` |
//!
//! 本番環境では `LOG_FORMAT=json` を指定し、1 イベント 1 行の JSON で出力する。

use std::{fmt, str::FromStr};

/// `RUST_LOG` 未設定時のディレクティブ
pub const DEFAULT_DIRECTIVES: &str = "info,portcullis=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// 1 イベント 1 行の JSON
    Json,
    /// 人間向けの整形出力
    #[default]
    Pretty,
}

/// 解釈できない `LOG_FORMAT` の値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLogFormat(pub String);

impl fmt::Display for UnknownLogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown LOG_FORMAT={:?}", self.0)
    }
}

impl std::error::Error for UnknownLogFormat {}

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    /// 大文字小文字は区別しない
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else if s.eq_ignore_ascii_case("pretty") {
            Ok(Self::Pretty)
        } else {
            Err(UnknownLogFormat(s.to_string()))
        }
    }
}

impl LogFormat {
    /// `LOG_FORMAT` から出力形式を決定する
    ///
    /// 解釈できない値は警告を stderr に出して [`Pretty`](LogFormat::Pretty) にする。
    /// トレーシング初期化前に呼ばれるため、警告は tracing を使わない。
    pub fn from_env() -> Self {
        let Ok(value) = std::env::var("LOG_FORMAT") else {
            return Self::default();
        };
        value.parse().unwrap_or_else(|e: UnknownLogFormat| {
            eprintln!("WARNING: {e}, falling back to pretty");
            Self::default()
        })
    }
}

/// トレーシング設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// ルートスパンの `service` フィールドに出力するサービス名
    pub service_name:       String,
    pub log_format:         LogFormat,
    /// `RUST_LOG` 未設定時に使うディレクティブ
    pub default_directives: String,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            default_directives: DEFAULT_DIRECTIVES.to_string(),
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// トレーシングを初期化する
///
/// `tracing_error::ErrorLayer` も登録し、インフラ層エラーが SpanTrace を取れるようにする。
/// プロセス内で 1 回だけ呼ぶこと。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directives));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();
}

/// サービス全体のルートスパンを作る
///
/// `main` で `entered()` して保持すると、以降のログに `service` が付く。
#[cfg(feature = "observability")]
pub fn service_span(config: &TracingConfig) -> tracing::Span {
    tracing::info_span!("app", service = %config.service_name)
}

/// HTTP リクエストごとのスパンを生成する
///
/// `TraceLayer::make_span_with` に渡す。ヘッダの値はスパンに含めない。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    tracing::info_span!(
        "request",
        http.method = %request.method(),
        http.path = %request.uri().path(),
    )
}
