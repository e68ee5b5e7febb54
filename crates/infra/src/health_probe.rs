//! # ヘルスプローブ
//!
//! 背後のバックエンド 1 つの稼働状態を確認する。
//! バックエンドの種類ごとにアダプタを実装する。
//!
//! プローブ自体はタイムアウトを持たない。呼び出し側（集約処理）がプローブごとに制限する。

use async_trait::async_trait;
use portcullis_domain::health::ProbeOutcome;

use crate::InfraError;

/// ヘルスプローブトレイト
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// レポートに表示するサービス名
    fn name(&self) -> &str;

    /// 稼働状態を確認する
    ///
    /// 応答はあったが異常な場合は `Ok(ProbeOutcome::down(..))`、
    /// 通信自体が失敗した場合は `Err` を返す。
    async fn check_health(&self) -> Result<ProbeOutcome, InfraError>;
}

/// HTTP エンドポイントを叩くプローブ
///
/// 2xx なら稼働中、それ以外のステータスは `HTTP <code>` を詳細として停止扱いにする。
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    name:   String,
    url:    String,
    client: reqwest::Client,
}

impl HttpHealthProbe {
    pub fn new(name: impl Into<String>, url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    fn name(&self) -> &str {
        &self.name
    }

    #[tracing::instrument(skip_all, fields(service = %self.name, url = %self.url))]
    async fn check_health(&self) -> Result<ProbeOutcome, InfraError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(ProbeOutcome::up())
        } else {
            tracing::debug!(status = status.as_u16(), "ヘルスエンドポイントが異常を返しました");
            Ok(ProbeOutcome::down(format!("HTTP {}", status.as_u16())))
        }
    }
}
