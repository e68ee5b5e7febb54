//! # クレーム
//!
//! トークンに埋め込む属性（クレーム）を定義する。
//!
//! - [`IdentityClaims`]: 認証成功時に確定する利用者の属性。トークン発行の入力
//! - [`VerifiedClaims`]: 署名と有効期限の検証を通過したトークンの中身
//!
//! 呼び出し元に公開するクレームからは、値が空（空白のみを含む）のものを除外する。

use std::collections::BTreeMap;

/// 標準クレーム名
pub mod names {
    pub const ISSUER: &str = "iss";
    pub const SUBJECT: &str = "sub";
    pub const ISSUED_AT: &str = "iat";
    pub const EXPIRES_AT: &str = "exp";
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const AFFILIATION: &str = "affiliation";

    /// トークンコーデックが値を決める予約クレーム
    pub const RESERVED: [&str; 4] = [ISSUER, SUBJECT, ISSUED_AT, EXPIRES_AT];
}

/// マスターキー認証で付与されるユーザー名
pub const MASTER_USERNAME: &str = "master";

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// 利用者の属性（クレーム名 → 値）
///
/// キーは一意で、順序に意味はない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityClaims(BTreeMap<String, String>);

impl IdentityClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// `username` クレームだけを持つクレームを作成する
    pub fn for_username(username: impl Into<String>) -> Self {
        Self::new().with(names::USERNAME, username)
    }

    /// クレームを追加した新しいインスタンスを返す
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn username(&self) -> Option<&str> {
        self.get(names::USERNAME)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 値が空のクレームを取り除く
    pub fn without_blank_values(self) -> Self {
        Self(self.0.into_iter().filter(|(_, v)| !is_blank(v)).collect())
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl FromIterator<(String, String)> for IdentityClaims {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 検証済みトークンのクレーム
///
/// 標準クレーム（発行者・主体・発行時刻・有効期限）と、それ以外の属性を分けて保持する。
/// タイムスタンプは UNIX 秒。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub issuer:     String,
    pub subject:    String,
    pub issued_at:  i64,
    pub expires_at: i64,
    pub claims:     IdentityClaims,
}

impl VerifiedClaims {
    /// 呼び出し元に返すクレームの一覧を作る
    ///
    /// すべての値を文字列にし、空の値を持つクレームを除外する。
    pub fn into_public_map(self) -> BTreeMap<String, String> {
        let mut map = self.claims.into_inner();
        map.insert(names::ISSUER.to_string(), self.issuer);
        map.insert(names::SUBJECT.to_string(), self.subject);
        map.insert(names::ISSUED_AT.to_string(), self.issued_at.to_string());
        map.insert(names::EXPIRES_AT.to_string(), self.expires_at.to_string());
        map.retain(|_, v| !is_blank(v));
        map
    }
}
