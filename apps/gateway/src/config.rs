//! # ゲートウェイ設定
//!
//! 環境変数からゲートウェイの設定を読み込む。
//!
//! 起動時に一度だけ読み込み、以降は変更しない。
//! 必須項目の欠落や値の形式不正は [`ConfigError`] として返す。

use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ISSUER: &str = "portcullis";
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
const DEFAULT_DIRECTORY_TIMEOUT_MS: u64 = 3000;
const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5000;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が設定されていない
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値の形式が不正
    #[error("{key} の値が不正です: {value}")]
    Invalid { key: &'static str, value: String },

    /// ヘルスチェック対象の記述が不正
    #[error("GATEWAY_HEALTH_TARGETS の要素が不正です（name=url 形式で指定してください）: {0}")]
    InvalidHealthTarget(String),
}

/// ヘルスチェック対象のバックエンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthTarget {
    pub name: String,
    pub url:  String,
}

/// ゲートウェイの設定
#[derive(Clone)]
pub struct GatewayConfig {
    /// バインドアドレス
    pub host:              String,
    /// ポート番号
    pub port:              u16,
    /// マスター API キー
    pub master_key:        String,
    /// トークン署名鍵（HS256）
    pub token_secret:      String,
    /// `iss` クレームの値
    pub token_issuer:      String,
    /// トークンの有効期間
    pub token_ttl:         Duration,
    /// ユーザーディレクトリ問い合わせのタイムアウト
    pub directory_timeout: Duration,
    /// ユーザー定義ファイル（JSON）
    pub users_file:        Option<PathBuf>,
    /// プローブ 1 つあたりのタイムアウト
    pub probe_timeout:     Duration,
    /// ヘルスチェック対象（登録順）
    pub health_targets:    Vec<HealthTarget>,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("master_key", &"[REDACTED]")
            .field("token_secret", &"[REDACTED]")
            .field("token_issuer", &self.token_issuer)
            .field("token_ttl", &self.token_ttl)
            .field("directory_timeout", &self.directory_timeout)
            .field("users_file", &self.users_file)
            .field("probe_timeout", &self.probe_timeout)
            .field("health_targets", &self.health_targets)
            .finish()
    }
}

impl GatewayConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー検索関数から設定を読み込む
    ///
    /// 空文字列の値は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            host:              get("GATEWAY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port:              parse_or("GATEWAY_PORT", get("GATEWAY_PORT"), DEFAULT_PORT)?,
            master_key:        require("GATEWAY_MASTER_KEY")?,
            token_secret:      require("GATEWAY_TOKEN_SECRET")?,
            token_issuer:      get("GATEWAY_TOKEN_ISSUER")
                .unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            token_ttl:         Duration::from_secs(parse_or(
                "GATEWAY_TOKEN_TTL_SECS",
                get("GATEWAY_TOKEN_TTL_SECS"),
                DEFAULT_TOKEN_TTL_SECS,
            )?),
            directory_timeout: Duration::from_millis(parse_or(
                "GATEWAY_DIRECTORY_TIMEOUT_MS",
                get("GATEWAY_DIRECTORY_TIMEOUT_MS"),
                DEFAULT_DIRECTORY_TIMEOUT_MS,
            )?),
            users_file:        get("GATEWAY_USERS_FILE").map(PathBuf::from),
            probe_timeout:     Duration::from_millis(parse_or(
                "GATEWAY_PROBE_TIMEOUT_MS",
                get("GATEWAY_PROBE_TIMEOUT_MS"),
                DEFAULT_PROBE_TIMEOUT_MS,
            )?),
            health_targets:    match get("GATEWAY_HEALTH_TARGETS") {
                Some(value) => parse_health_targets(&value)?,
                None => Vec::new(),
            },
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// `name=url,name=url` 形式のヘルスチェック対象を解釈する
///
/// 記述順を保持する。空の要素は無視する。
pub fn parse_health_targets(value: &str) -> Result<Vec<HealthTarget>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, url) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidHealthTarget(entry.to_string()))?;
            let (name, url) = (name.trim(), url.trim());
            if name.is_empty() || url.is_empty() {
                return Err(ConfigError::InvalidHealthTarget(entry.to_string()));
            }
            Ok(HealthTarget {
                name: name.to_string(),
                url:  url.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("GATEWAY_MASTER_KEY", "master-key"),
        ("GATEWAY_TOKEN_SECRET", "token-secret"),
    ];

    #[test]
    fn test_必須項目のみでデフォルト値が適用される() {
        let config = GatewayConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.master_key, "master-key");
        assert_eq!(config.token_secret, "token-secret");
        assert_eq!(config.token_issuer, "portcullis");
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.directory_timeout, Duration::from_millis(3000));
        assert_eq!(config.users_file, None);
        assert_eq!(config.probe_timeout, Duration::from_millis(5000));
        assert!(config.health_targets.is_empty());
    }

    #[test]
    fn test_すべての項目を上書きできる() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("GATEWAY_HOST", "127.0.0.1"),
            ("GATEWAY_PORT", "9000"),
            ("GATEWAY_TOKEN_ISSUER", "example"),
            ("GATEWAY_TOKEN_TTL_SECS", "60"),
            ("GATEWAY_DIRECTORY_TIMEOUT_MS", "250"),
            ("GATEWAY_USERS_FILE", "/etc/portcullis/users.json"),
            ("GATEWAY_PROBE_TIMEOUT_MS", "1500"),
            ("GATEWAY_HEALTH_TARGETS", "users=http://users/health"),
        ]);

        let config = GatewayConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.token_issuer, "example");
        assert_eq!(config.token_ttl, Duration::from_secs(60));
        assert_eq!(config.directory_timeout, Duration::from_millis(250));
        assert_eq!(
            config.users_file,
            Some(PathBuf::from("/etc/portcullis/users.json"))
        );
        assert_eq!(config.probe_timeout, Duration::from_millis(1500));
        assert_eq!(config.health_targets.len(), 1);
    }

    #[rstest]
    #[case("GATEWAY_MASTER_KEY")]
    #[case("GATEWAY_TOKEN_SECRET")]
    fn test_必須項目がなければmissing(#[case] missing: &'static str) {
        let pairs: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != missing).collect();

        let result = GatewayConfig::from_lookup(lookup_from(&pairs));

        assert_eq!(result.unwrap_err(), ConfigError::Missing(missing));
    }

    #[test]
    fn test_空文字の必須項目は未設定として扱う() {
        let pairs = [("GATEWAY_MASTER_KEY", "  "), ("GATEWAY_TOKEN_SECRET", "s")];

        let result = GatewayConfig::from_lookup(lookup_from(&pairs));

        assert_eq!(result.unwrap_err(), ConfigError::Missing("GATEWAY_MASTER_KEY"));
    }

    #[test]
    fn test_数値でないポートはinvalid() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("GATEWAY_PORT", "http"));

        let result = GatewayConfig::from_lookup(lookup_from(&pairs));

        assert_eq!(
            result.unwrap_err(),
            ConfigError::Invalid {
                key:   "GATEWAY_PORT",
                value: "http".to_string(),
            }
        );
    }

    #[test]
    fn test_debug出力に秘密情報を含まない() {
        let config = GatewayConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();

        let debug = format!("{config:?}");

        assert!(!debug.contains("master-key"));
        assert!(!debug.contains("token-secret"));
    }

    #[test]
    fn test_ヘルスチェック対象を記述順に解釈する() {
        let targets =
            parse_health_targets(" users = http://users/health , billing=http://billing/health,")
                .unwrap();

        assert_eq!(
            targets,
            vec![
                HealthTarget {
                    name: "users".to_string(),
                    url:  "http://users/health".to_string(),
                },
                HealthTarget {
                    name: "billing".to_string(),
                    url:  "http://billing/health".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_urlにイコールを含んでもよい() {
        let targets = parse_health_targets("search=http://search/health?verbose=1").unwrap();

        assert_eq!(targets[0].url, "http://search/health?verbose=1");
    }

    #[rstest]
    #[case("users")]
    #[case("=http://users/health")]
    #[case("users=")]
    fn test_不正なヘルスチェック対象はエラー(#[case] value: &str) {
        let result = parse_health_targets(value);

        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidHealthTarget(value.to_string())
        );
    }
}
