//! # 認証情報
//!
//! リクエストヘッダから取り出す認証情報を表現する。
//!
//! | ヘッダ | 認証情報 |
//! |--------|----------|
//! | `X-Api-Key: <key>` | [`Credential::MasterKey`] |
//! | `Authorization: Basic base64(username:password)` | [`Credential::BasicAuth`] |
//! | `Authorization: Bearer <token>` | [`Credential::BearerToken`] |
//!
//! 1 リクエストにつき、いずれか 1 つだけが適用される。
//! マスターキーヘッダが存在する場合は Authorization ヘッダを見ない。

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::password::PlainPassword;

/// マスターキーを運ぶヘッダ名
pub const MASTER_KEY_HEADER: &str = "x-api-key";

/// リクエストから取り出した認証情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    MasterKey(String),
    BasicAuth {
        username: String,
        password: PlainPassword,
    },
    BearerToken {
        access_token: String,
    },
}

impl Credential {
    /// ヘッダ値から認証情報を決定する
    ///
    /// マスターキーヘッダが存在すれば値によらず [`Credential::MasterKey`] になる。
    /// それ以外は Authorization ヘッダを解釈し、解釈できなければ `None` を返す。
    pub fn from_headers(master_key: Option<&str>, authorization: Option<&str>) -> Option<Self> {
        match master_key {
            Some(key) => Some(Self::MasterKey(key.to_string())),
            None => authorization.and_then(Self::parse_authorization),
        }
    }

    /// Authorization ヘッダの値を解釈する
    ///
    /// スキーム名の大文字小文字は区別しない。
    /// Basic の場合、デコード結果の最初の `:` でユーザー名とパスワードに分割する。
    pub fn parse_authorization(value: &str) -> Option<Self> {
        let (scheme, rest) = value.trim().split_once(' ')?;
        let rest = rest.trim();

        if scheme.eq_ignore_ascii_case("basic") {
            let decoded = STANDARD.decode(rest).ok()?;
            let decoded = String::from_utf8(decoded).ok()?;
            let (username, password) = decoded.split_once(':')?;
            Some(Self::BasicAuth {
                username: username.to_string(),
                password: PlainPassword::new(password),
            })
        } else if scheme.eq_ignore_ascii_case("bearer") && !rest.is_empty() {
            Some(Self::BearerToken {
                access_token: rest.to_string(),
            })
        } else {
            None
        }
    }

    /// Bearer トークンを取り出す
    pub fn bearer_token(authorization: Option<&str>) -> Option<String> {
        match authorization.and_then(Self::parse_authorization) {
            Some(Self::BearerToken { access_token }) => Some(access_token),
            _ => None,
        }
    }
}
