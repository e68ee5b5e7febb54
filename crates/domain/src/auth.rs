//! # 認証結果
//!
//! 認証情報の解決結果と、トークン検証の失敗種別を定義する。
//!
//! ## 失敗の分類
//!
//! | 分類 | 型 | 原因 |
//! |------|----|------|
//! | 認証情報なし | [`ResolutionError::MissingCredentials`] | クライアント |
//! | 認証拒否 | [`AuthOutcome::Rejected`] | クライアント |
//! | 依存先の障害 | [`ResolutionError::DirectoryTimeout`] / [`ResolutionError::DirectoryUnavailable`] | サーバー |
//! | トークン不正 | [`TokenError`] | クライアント |

use thiserror::Error;

use crate::claims::IdentityClaims;

/// 認証拒否時の理由
///
/// ユーザーの存在有無を推測させないため、理由によらず同じ文言を使う。
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// 認証情報の解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// 認証成功
    Authenticated { identity_claims: IdentityClaims },
    /// 認証情報はあるが正しくない
    Rejected { reason: &'static str },
    /// 認証情報を判定できなかった
    ResolutionError { cause: ResolutionError },
}

impl AuthOutcome {
    pub fn authenticated(identity_claims: IdentityClaims) -> Self {
        Self::Authenticated { identity_claims }
    }

    pub fn rejected() -> Self {
        Self::Rejected {
            reason: INVALID_CREDENTIALS,
        }
    }

    pub fn resolution_error(cause: ResolutionError) -> Self {
        Self::ResolutionError { cause }
    }
}

/// 認証情報の解決エラー
///
/// 認証拒否（[`AuthOutcome::Rejected`]）とは区別する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// マスターキーも解釈可能な Authorization ヘッダもない
    #[error("Authorization header required")]
    MissingCredentials,

    /// ユーザーディレクトリの応答がタイムアウトした
    #[error("ユーザーディレクトリの応答がタイムアウトしました")]
    DirectoryTimeout,

    /// ユーザーディレクトリへの問い合わせが失敗した
    #[error("ユーザーディレクトリへの問い合わせに失敗しました: {0}")]
    DirectoryUnavailable(String),
}

impl ResolutionError {
    /// 依存先の障害によるエラーかどうか
    pub fn is_dependency_failure(&self) -> bool {
        !matches!(self, Self::MissingCredentials)
    }
}

/// トークン検証の失敗種別
///
/// HTTP 境界では同じ 401 にまとめるが、診断とテストのために種別を区別する。
/// [`kind`](TokenError::kind) はバリアント名を返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, strum::IntoStaticStr)]
pub enum TokenError {
    /// トークンとして解釈できない
    #[error("トークンを解釈できません")]
    Malformed,

    /// 署名が一致しない
    #[error("署名が不正です")]
    BadSignature,

    /// 有効期限切れ
    #[error("有効期限が切れています")]
    Expired,
}

impl TokenError {
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}
