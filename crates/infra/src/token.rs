//! # アクセストークン
//!
//! HS256 署名付きトークン（JWT）の発行と検証を行う。
//!
//! ## 検証順序
//!
//! 1. 構造・署名の検証（失敗 → `Malformed` / `BadSignature`）
//!    ヘッダ部とペイロード部が読めて署名部だけが Base64 として壊れている場合は `BadSignature`
//! 2. 有効期限の検証（`now <= exp` なら有効、秒単位）
//!
//! 有効期限は jsonwebtoken 側では検証せず、注入された [`Clock`] の時刻で判定する。
//! 検証結果はトークン・署名鍵・現在時刻だけで決まる。

use std::{collections::BTreeMap, fmt, sync::Arc, time::Duration};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use portcullis_domain::{
    auth::TokenError,
    claims::{IdentityClaims, VerifiedClaims, names},
    clock::Clock,
};
use serde::{Deserialize, Serialize};

/// 署名済みトークン文字列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// トークン発行の設定
///
/// 起動時に一度だけ構築し、プロセス全体で共有する。
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub issuer: String,
    pub ttl:    Duration,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// トークンコーデックトレイト
pub trait TokenCodec: Send + Sync {
    /// 認証済みのクレームからトークンを発行する
    ///
    /// `iss` / `sub` / `iat` / `exp` はコーデックが設定する。
    /// 入力に同名のクレームがあっても上書きされる。
    fn issue(&self, claims: &IdentityClaims) -> AccessToken;

    /// トークンを検証し、クレームを取り出す
    ///
    /// 返すクレームからは空の値を除外する。
    fn verify(&self, token: &str) -> Result<VerifiedClaims, TokenError>;
}

/// トークンのペイロード
#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    iss:    String,
    sub:    String,
    iat:    i64,
    exp:    i64,
    #[serde(flatten)]
    claims: BTreeMap<String, String>,
}

/// HS256 による [`TokenCodec`] 実装
pub struct JwtTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation:   Validation,
    issuer:       String,
    ttl_secs:     i64,
    clock:        Arc<dyn Clock>,
}

impl JwtTokenCodec {
    pub fn new(settings: TokenSettings, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            issuer: settings.issuer,
            ttl_secs: i64::try_from(settings.ttl.as_secs()).unwrap_or(i64::MAX),
            clock,
        }
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, claims: &IdentityClaims) -> AccessToken {
        let issued_at = self.clock.timestamp();
        let payload = TokenPayload {
            iss:    self.issuer.clone(),
            sub:    claims.username().unwrap_or_default().to_string(),
            iat:    issued_at,
            exp:    issued_at.saturating_add(self.ttl_secs),
            claims: claims
                .iter()
                .filter(|(name, _)| !names::RESERVED.contains(name))
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        };

        // encode が失敗するのは鍵種別とアルゴリズムの不一致か、ペイロードのシリアライズ失敗のみ。
        // 鍵は from_secret の HMAC 鍵でアルゴリズムは HS256 固定、ペイロードは文字列と整数だけで構成される
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .expect("HS256 による署名は失敗しない");
        AccessToken(token)
    }

    fn verify(&self, token: &str) -> Result<VerifiedClaims, TokenError> {
        let payload = jsonwebtoken::decode::<TokenPayload>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify_decode_error(token, e.kind()))?
            .claims;

        if self.clock.timestamp() > payload.exp {
            return Err(TokenError::Expired);
        }

        Ok(VerifiedClaims {
            issuer:     payload.iss,
            subject:    payload.sub,
            issued_at:  payload.iat,
            expires_at: payload.exp,
            claims:     payload.claims.into_iter().collect::<IdentityClaims>().without_blank_values(),
        })
    }
}

fn classify_decode_error(token: &str, kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
        ErrorKind::Base64(_) if only_signature_is_corrupt(token) => TokenError::BadSignature,
        _ => TokenError::Malformed,
    }
}

/// 3 セグメント構成で、ヘッダ部とペイロード部が Base64URL として読めるか
///
/// このとき Base64 エラーの原因は署名部にある。
fn only_signature_is_corrupt(token: &str) -> bool {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, _signature] = segments.as_slice() else {
        return false;
    };
    URL_SAFE_NO_PAD.decode(header).is_ok() && URL_SAFE_NO_PAD.decode(payload).is_ok()
}
