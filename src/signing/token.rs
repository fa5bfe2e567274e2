//! JWT signing protocol.
//!
//! Builds an HS256 JWS in compact serialization. The client id doubles as
//! the `kid` header so the relying party knows which embed secret to verify
//! against. The token rides in a fixed-shape URL:
//! `base_url + "?:embed=true&:jwt=" + token`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::hmac;
use serde::Serialize;
use tracing::debug;

use crate::error::SignerResult;

use super::{Clock, CredentialSigner, NonceSource, SigningRequest, SystemClock, UuidNonceSource};

/// Hard cap on the credential lifetime: 30 days, regardless of what the
/// caller asks for.
pub const MAX_SESSION_LENGTH: i64 = 2_592_000;

#[derive(Serialize)]
struct JwsHeader<'a> {
    alg: &'static str,
    typ: &'static str,
    kid: &'a str,
}

/// Claims carried by the embed token.
#[derive(Debug, Serialize)]
pub struct Claims {
    /// Subject: the user's email address.
    pub sub: String,
    /// Issuer: the embed client id.
    pub iss: String,
    /// Unique token id.
    pub jti: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
    pub account_type: String,
    pub teams: Vec<String>,
    /// Reserved for future per-user custom claims.
    pub user_attributes: serde_json::Map<String, serde_json::Value>,
}

/// Signer for the JWT protocol.
pub struct TokenSigner {
    nonce_source: Box<dyn NonceSource>,
    clock: Box<dyn Clock>,
}

impl TokenSigner {
    /// Create a signer using the system clock and random UUID token ids.
    pub fn new() -> Self {
        Self::with_sources(Box::new(UuidNonceSource), Box::new(SystemClock))
    }

    /// Create a signer with injected nonce and time sources.
    pub fn with_sources(nonce_source: Box<dyn NonceSource>, clock: Box<dyn Clock>) -> Self {
        Self {
            nonce_source,
            clock,
        }
    }
}

impl Default for TokenSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSigner for TokenSigner {
    fn sign(&self, request: &SigningRequest) -> SignerResult<String> {
        request.validate()?;

        let now = self.clock.unix_now();
        // A negative session length yields exp <= now: an expired-on-issue
        // token, not an error.
        let exp = now + request.session_length.min(MAX_SESSION_LENGTH);

        let claims = Claims {
            sub: request.email.clone(),
            iss: request.client_id.clone(),
            jti: self.nonce_source.next_nonce(),
            iat: now,
            exp,
            account_type: request.account_type.clone(),
            teams: request.parse_teams(),
            user_attributes: serde_json::Map::new(),
        };

        let header = JwsHeader {
            alg: "HS256",
            typ: "JWT",
            kid: &request.client_id,
        };

        let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
        let claims_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let key = hmac::Key::new(hmac::HMAC_SHA256, request.secret.as_bytes());
        let tag = hmac::sign(&key, signing_input.as_bytes());
        let token = format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(tag.as_ref()));

        debug!(
            client_id = %request.client_id,
            account_type = %request.account_type,
            expires_at = exp,
            "signed embed token"
        );

        Ok(format!("{}?:embed=true&:jwt={}", request.embed_path, token))
    }
}
