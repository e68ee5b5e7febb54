//! # ユーザーディレクトリ
//!
//! ユーザー名からユーザーを検索する。
//!
//! Basic 認証の解決で使用する。問い合わせ先が外部サービスの場合は失敗・遅延しうるため、
//! 呼び出し側でタイムアウトを設定すること。

use std::{collections::HashMap, path::Path, sync::Arc};

use async_trait::async_trait;
use portcullis_domain::user::User;
use serde::Deserialize;

use crate::{Argon2PasswordVerifier, InfraError};

/// ユーザーディレクトリトレイト
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// ユーザー名でユーザーを検索する
    ///
    /// 見つからない場合は `Ok(None)` を返す。
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, InfraError>;
}

/// ユーザー定義ファイルの 1 レコード
///
/// ```json
/// { "username": "alice", "password_hash": "$argon2id$...", "email": "alice@example.com" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub username:      String,
    pub password_hash: String,
    #[serde(default)]
    pub email:         Option<String>,
    #[serde(default)]
    pub affiliation:   Option<String>,
}

impl UserRecord {
    fn into_user(self) -> Result<User, InfraError> {
        let verifier = Argon2PasswordVerifier::new(&self.username, self.password_hash)?;
        let mut user = User::new(self.username, Arc::new(verifier));
        if let Some(email) = self.email {
            user = user.with_email(email);
        }
        if let Some(affiliation) = self.affiliation {
            user = user.with_affiliation(affiliation);
        }
        Ok(user)
    }
}

/// 起動時に読み込んだユーザーを保持するディレクトリ
#[derive(Debug, Default)]
pub struct StaticUserDirectory {
    users: HashMap<String, User>,
}

impl StaticUserDirectory {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|user| (user.username().to_string(), user))
                .collect(),
        }
    }

    /// レコードからディレクトリを構築する
    ///
    /// # Errors
    ///
    /// - パスワードハッシュの形式が不正なレコードがある場合
    pub fn from_records(records: Vec<UserRecord>) -> Result<Self, InfraError> {
        let users = records
            .into_iter()
            .map(UserRecord::into_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(users))
    }

    /// JSON 配列からディレクトリを構築する
    pub fn from_json_str(json: &str) -> Result<Self, InfraError> {
        let records: Vec<UserRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// JSON ファイルからディレクトリを構築する
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, InfraError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let directory = Self::from_json_str(&json)?;
        tracing::info!(users = directory.len(), "ユーザーディレクトリを読み込みました");
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, InfraError> {
        Ok(self.users.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use portcullis_domain::password::PlainPassword;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{InfraErrorKind, password::tests::hash_of};

    fn users_json() -> String {
        serde_json::json!([
            {
                "username": "alice",
                "password_hash": hash_of("correct"),
                "email": "alice@example.com"
            },
            {
                "username": "bob",
                "password_hash": hash_of("hunter2"),
                "affiliation": "ops"
            }
        ])
        .to_string()
    }

    #[tokio::test]
    async fn test_登録済みユーザーを検索できる() {
        let sut = StaticUserDirectory::from_json_str(&users_json()).unwrap();

        let alice = sut.find_by_username("alice").await.unwrap().unwrap();

        assert_eq!(alice.username(), "alice");
        assert_eq!(alice.email(), Some("alice@example.com"));
        assert!(alice.authenticate(&PlainPassword::new("correct")));
        assert!(!alice.authenticate(&PlainPassword::new("hunter2")));
    }

    #[tokio::test]
    async fn test_未登録ユーザーはnoneを返す() {
        let sut = StaticUserDirectory::from_json_str(&users_json()).unwrap();

        let result = sut.find_by_username("mallory").await.unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_任意項目は省略できる() {
        let sut = StaticUserDirectory::from_json_str(&users_json()).unwrap();

        assert_eq!(sut.len(), 2);
        let bob = sut.users.get("bob").unwrap();
        assert_eq!(bob.email(), None);
        assert_eq!(bob.affiliation(), Some("ops"));
    }

    #[test]
    fn test_不正なハッシュを含むとエラー() {
        let json = r#"[{ "username": "eve", "password_hash": "plaintext" }]"#;

        let result = StaticUserDirectory::from_json_str(json);

        assert!(matches!(
            result.unwrap_err().kind(),
            InfraErrorKind::InvalidPasswordHash { .. }
        ));
    }

    #[test]
    fn test_jsonとして不正ならシリアライズエラー() {
        let result = StaticUserDirectory::from_json_str("{not json");

        assert!(matches!(
            result.unwrap_err().kind(),
            InfraErrorKind::Serialization(_)
        ));
    }

    #[test]
    fn test_存在しないファイルは入出力エラー() {
        let result = StaticUserDirectory::from_json_file("/nonexistent/portcullis-users.json");

        assert!(matches!(result.unwrap_err().kind(), InfraErrorKind::Io(_)));
    }
}
