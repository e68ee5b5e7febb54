//! # ユーザー
//!
//! ユーザーディレクトリが返すユーザーを表現する。
//! ゲートウェイはユーザーを永続化せず、認証の間だけ保持する。

use std::{fmt, sync::Arc};

use crate::{
    claims::{IdentityClaims, names},
    password::{PasswordVerifier, PlainPassword},
};

/// ユーザー
///
/// パスワードは保持せず、検証能力（[`PasswordVerifier`]）だけを持つ。
#[derive(Clone)]
pub struct User {
    username:    String,
    verifier:    Arc<dyn PasswordVerifier>,
    email:       Option<String>,
    affiliation: Option<String>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("affiliation", &self.affiliation)
            .finish_non_exhaustive()
    }
}

impl User {
    pub fn new(username: impl Into<String>, verifier: Arc<dyn PasswordVerifier>) -> Self {
        Self {
            username: username.into(),
            verifier,
            email: None,
            affiliation: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn affiliation(&self) -> Option<&str> {
        self.affiliation.as_deref()
    }

    /// 候補パスワードを検証する
    pub fn authenticate(&self, candidate: &PlainPassword) -> bool {
        self.verifier.authenticate(candidate)
    }

    /// ユーザーの属性からクレームを作る
    ///
    /// `username` は必ず含み、メールアドレスと所属は存在する場合のみ含める。
    /// 発行者（`iss`）はトークン発行時に付与される。
    pub fn identity_claims(&self) -> IdentityClaims {
        let mut claims = IdentityClaims::for_username(&self.username);
        if let Some(email) = &self.email {
            claims.insert(names::EMAIL, email);
        }
        if let Some(affiliation) = &self.affiliation {
            claims.insert(names::AFFILIATION, affiliation);
        }
        claims
    }
}
