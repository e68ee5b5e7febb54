//! # ヘルス情報
//!
//! 背後のバックエンドごとの稼働状態と、その集約結果を表現する。
//! 集約結果はリクエストごとに作り直し、キャッシュしない。

/// 稼働状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Up,
    Down,
}

/// 1 回のプローブ結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub status: HealthStatus,
    pub detail: Option<String>,
}

impl ProbeOutcome {
    pub fn up() -> Self {
        Self {
            status: HealthStatus::Up,
            detail: None,
        }
    }

    pub fn down(detail: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Down,
            detail: Some(detail.into()),
        }
    }
}

/// 1 つのバックエンドのヘルス情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHealth {
    pub service_name: String,
    pub status:       HealthStatus,
    pub detail:       Option<String>,
}

impl ServiceHealth {
    pub fn from_outcome(service_name: impl Into<String>, outcome: ProbeOutcome) -> Self {
        Self {
            service_name: service_name.into(),
            status:       outcome.status,
            detail:       outcome.detail,
        }
    }

    pub fn down(service_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::from_outcome(service_name, ProbeOutcome::down(detail))
    }

    pub fn is_up(&self) -> bool {
        self.status == HealthStatus::Up
    }
}

/// 集約結果
///
/// 登録済みプローブ 1 つにつき 1 エントリを、登録順に保持する。
/// 全体の合否は判定しない（呼び出し元の責務）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport(Vec<ServiceHealth>);

impl HealthReport {
    pub fn new(entries: Vec<ServiceHealth>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[ServiceHealth] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_entries(self) -> Vec<ServiceHealth> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upの結果にはdetailがない() {
        let health = ServiceHealth::from_outcome("users", ProbeOutcome::up());

        assert!(health.is_up());
        assert_eq!(health.detail, None);
    }

    #[test]
    fn test_downの結果にはdetailが付く() {
        let health = ServiceHealth::down("orders", "HTTP 503");

        assert!(!health.is_up());
        assert_eq!(health.detail.as_deref(), Some("HTTP 503"));
    }

    #[test]
    fn test_reportは渡した順序を保持する() {
        let report = HealthReport::new(vec![
            ServiceHealth::down("b", "x"),
            ServiceHealth::from_outcome("a", ProbeOutcome::up()),
        ]);

        let names: Vec<_> = report.entries().iter().map(|h| h.service_name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }
}
