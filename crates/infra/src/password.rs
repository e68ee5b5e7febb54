//! # パスワード検証
//!
//! Argon2id の PHC 文字列によるパスワード検証を提供する。
//! ハッシュの形式はユーザーディレクトリ読み込み時に検証し、不正な形式のユーザーは登録しない。

use argon2::{
    Argon2,
    PasswordVerifier as _,
    password_hash::PasswordHash as Argon2PasswordHash,
};
use portcullis_domain::password::{PasswordVerifier, PlainPassword};

use crate::InfraError;

/// 存在しないユーザーの検証に使うダミーハッシュ
///
/// `Argon2::default()` と同じパラメータ（m=19456, t=2, p=1）の有効な Argon2id 形式。
/// どのパスワードとも一致しない。
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Argon2 ハッシュによるパスワード検証の実装
///
/// パラメータ（メモリ・反復回数・並列度）は PHC 文字列に含まれる値を使う。
#[derive(Debug, Clone)]
pub struct Argon2PasswordVerifier {
    hash: String,
}

impl Argon2PasswordVerifier {
    /// PHC 文字列から検証器を作成する
    ///
    /// # Errors
    ///
    /// - PHC 文字列として解釈できない場合
    pub fn new(username: &str, hash: impl Into<String>) -> Result<Self, InfraError> {
        let hash = hash.into();
        Argon2PasswordHash::new(&hash).map_err(|e| {
            tracing::warn!(username, error = %e, "不正なパスワードハッシュ形式");
            InfraError::invalid_password_hash(username)
        })?;
        Ok(Self { hash })
    }

    /// ユーザーが存在しない場合の検証器を作成する（タイミング攻撃対策）
    ///
    /// 実在ユーザーと同じコストの Argon2id 検証を行い、常に不一致を返す。
    pub fn dummy() -> Self {
        Self {
            hash: DUMMY_HASH.to_string(),
        }
    }
}

impl PasswordVerifier for Argon2PasswordVerifier {
    fn authenticate(&self, candidate: &PlainPassword) -> bool {
        // 形式は new() で検証済み
        let Ok(parsed) = Argon2PasswordHash::new(&self.hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_str().as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use argon2::{PasswordHasher as _, password_hash::SaltString};

    use super::*;

    /// テスト用に Argon2id ハッシュを生成する（ソルト固定）
    pub(crate) fn hash_of(password: &str) -> String {
        let salt = SaltString::encode_b64(b"portcullis-salt!").unwrap();
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_ダミーハッシュは有効な形式() {
        assert!(Argon2PasswordHash::new(DUMMY_HASH).is_ok());
        assert!(Argon2PasswordVerifier::new("dummy", DUMMY_HASH).is_ok());
    }

    #[test]
    fn test_ダミー検証器はどのパスワードとも一致しない() {
        let sut = Argon2PasswordVerifier::dummy();

        assert!(!sut.authenticate(&PlainPassword::new("correct")));
        assert!(!sut.authenticate(&PlainPassword::new("")));
    }

    #[test]
    fn test_正しいパスワードを検証できる() {
        let sut = Argon2PasswordVerifier::new("alice", hash_of("correct")).unwrap();

        assert!(sut.authenticate(&PlainPassword::new("correct")));
    }

    #[test]
    fn test_不正なパスワードは一致しない() {
        let sut = Argon2PasswordVerifier::new("alice", hash_of("correct")).unwrap();

        assert!(!sut.authenticate(&PlainPassword::new("wrong")));
        assert!(!sut.authenticate(&PlainPassword::new("")));
    }

    #[test]
    fn test_不正なハッシュ形式はエラー() {
        let result = Argon2PasswordVerifier::new("alice", "not-a-valid-hash");

        assert!(matches!(
            result.unwrap_err().kind(),
            crate::InfraErrorKind::InvalidPasswordHash { username } if username == "alice"
        ));
    }

    #[test]
    fn test_平文はハッシュとして受け付けない() {
        assert!(Argon2PasswordVerifier::new("alice", "correct").is_err());
    }
}
