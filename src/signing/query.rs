//! Query-string signing protocol.
//!
//! Canonicalizes the embed parameters into an ordered query string, signs
//! `path + "?" + params` with HMAC-SHA256, and appends the lowercase hex
//! signature as the final `:signature` parameter. The relying service
//! recomputes the HMAC over everything before `&:signature=` to verify.

use ring::hmac;
use tracing::debug;

use crate::error::SignerResult;

use super::{
    CanonicalParams, Clock, CredentialSigner, NonceSource, SigningRequest, SystemClock,
    UuidNonceSource,
};

/// The query protocol always issues embed-user credentials; the account
/// type is not caller-selectable on this path.
const QUERY_ACCOUNT_TYPE: &str = "embedUser";

/// Signer for the query-string protocol.
pub struct QuerySigner {
    nonce_source: Box<dyn NonceSource>,
    clock: Box<dyn Clock>,
}

impl QuerySigner {
    /// Create a signer using the system clock and random UUID nonces.
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

impl Default for QuerySigner {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSigner for QuerySigner {
    fn sign(&self, request: &SigningRequest) -> SignerResult<String> {
        request.validate()?;

        // Nonce and timestamp are read once per call and signed along with
        // everything else; an empty team still serializes as an empty value.
        let nonce = self.nonce_source.next_nonce();
        let time = self.clock.unix_now();

        let mut params = CanonicalParams::new();
        params.push(":nonce", nonce);
        params.push(":email", &request.email);
        params.push(":external_user_id", &request.external_user_id);
        params.push(":client_id", &request.client_id);
        params.push(":time", time.to_string());
        params.push(":session_length", request.session_length.to_string());
        params.push(":mode", &request.mode);
        params.push(":external_user_team", &request.teams);
        params.push(":account_type", QUERY_ACCOUNT_TYPE);

        let url_with_params = format!("{}?{}", request.embed_path, params.serialize());

        let key = hmac::Key::new(hmac::HMAC_SHA256, request.secret.as_bytes());
        let tag = hmac::sign(&key, url_with_params.as_bytes());
        let signature = hex::encode(tag.as_ref());

        debug!(
            client_id = %request.client_id,
            mode = %request.mode,
            session_length = request.session_length,
            "signed embed query string"
        );

        let mut signature_param = CanonicalParams::new();
        signature_param.push(":signature", signature);
        Ok(format!("{}&{}", url_with_params, signature_param.serialize()))
    }
}
