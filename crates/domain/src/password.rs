//! # パスワード
//!
//! パスワード関連の値オブジェクトと、パスワード検証能力のトレイトを定義する。
//!
//! | 型 | 用途 |
//! |---|------|
//! | [`PlainPassword`] | Basic 認証で受け取った平文パスワード |
//! | [`PasswordVerifier`] | ユーザーごとのパスワード検証能力 |

/// 平文パスワード
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
    }
}

impl PlainPassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// パスワード検証能力
///
/// ユーザーディレクトリが [`User`](crate::user::User) に持たせる。
/// 平文同士の比較ではなく、保存形式（ハッシュ等）に応じた検証を実装側が行う。
pub trait PasswordVerifier: Send + Sync {
    /// 候補パスワードが一致すれば `true` を返す
    fn authenticate(&self, candidate: &PlainPassword) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_平文パスワードのdebug出力はマスクされる() {
        let password = PlainPassword::new("secret");
        let debug = format!("{password:?}");

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_平文パスワードの値を取り出せる() {
        assert_eq!(PlainPassword::new("correct").as_str(), "correct");
    }
}
