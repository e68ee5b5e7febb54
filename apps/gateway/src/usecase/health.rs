//! # ヘルス集約
//!
//! 登録されたプローブをすべて並行に実行し、結果を 1 つのレポートにまとめる。
//!
//! - プローブごとに独立したタスクとして、注入されたランタイム上で実行する
//! - プローブごとにタイムアウトを適用する
//! - エラー・panic・タイムアウトはいずれも `Down` として記録する
//! - レポートの順序は登録順
//!
//! 全体の判定（ready / not_ready）は呼び出し側のハンドラが行う。

use std::{sync::Arc, time::Duration};

use portcullis_domain::health::{HealthReport, ServiceHealth};
use portcullis_infra::HealthProbe;
use tokio::runtime::Handle;

/// ヘルス集約器
#[derive(Debug, Clone)]
pub struct HealthAggregator {
    handle:        Handle,
    probe_timeout: Duration,
}

impl HealthAggregator {
    pub fn new(handle: Handle, probe_timeout: Duration) -> Self {
        Self {
            handle,
            probe_timeout,
        }
    }

    /// すべてのプローブを並行に実行する
    ///
    /// レポートはプローブ 1 つにつき必ず 1 件を含む。
    #[tracing::instrument(skip_all, fields(probes = probes.len()))]
    pub async fn check(&self, probes: &[Arc<dyn HealthProbe>]) -> HealthReport {
        let timeout = self.probe_timeout;
        let tasks: Vec<_> = probes
            .iter()
            .map(|probe| {
                let probe = Arc::clone(probe);
                let name = probe.name().to_string();
                let task = self
                    .handle
                    .spawn(async move { tokio::time::timeout(timeout, probe.check_health()).await });
                (name, task)
            })
            .collect();

        let mut entries = Vec::with_capacity(tasks.len());
        for (name, task) in tasks {
            let entry = match task.await {
                Ok(Ok(Ok(outcome))) => ServiceHealth::from_outcome(name, outcome),
                Ok(Ok(Err(e))) => {
                    tracing::warn!(service = %name, error = %e, "ヘルスチェックに失敗しました");
                    ServiceHealth::down(name, e.to_string())
                }
                Ok(Err(_)) => {
                    tracing::warn!(service = %name, "ヘルスチェックがタイムアウトしました");
                    ServiceHealth::down(name, format!("timed out after {}ms", timeout.as_millis()))
                }
                Err(join_error) => {
                    tracing::warn!(service = %name, error = %join_error, "ヘルスチェックが異常終了しました");
                    ServiceHealth::down(name, "probe panicked")
                }
            };
            entries.push(entry);
        }

        HealthReport::new(entries)
    }
}
