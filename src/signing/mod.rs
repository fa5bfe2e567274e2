//! Credential signing module.
//!
//! Builds the signed artifact that authorizes an embedded analytics view:
//! either an HMAC-SHA256 signed query string appended to the embed path,
//! or an HS256 JWT embedded in a fixed-shape URL. Protocol selection is
//! driven by configuration.

mod clock;
mod nonce;
mod params;
mod query;
mod request;
mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use nonce::{FixedNonceSource, NonceSource, UuidNonceSource};
pub use params::{encode_component, CanonicalParams};
pub use query::QuerySigner;
pub use request::SigningRequest;
pub use token::{Claims, TokenSigner, MAX_SESSION_LENGTH};

use crate::config::Protocol;
use crate::error::SignerResult;

/// A signer that turns a request into a signed embed URL.
///
/// Both protocol implementations are stateless and safe to share across
/// threads; each call reads the clock and nonce source independently.
pub trait CredentialSigner: Send + Sync {
    /// Produce a signed URL authorizing the requested embed session.
    fn sign(&self, request: &SigningRequest) -> SignerResult<String>;
}

/// Construct the signer selected by configuration.
pub fn signer_for(protocol: Protocol) -> Box<dyn CredentialSigner> {
    match protocol {
        Protocol::Query => Box::new(QuerySigner::new()),
        Protocol::Jwt => Box::new(TokenSigner::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signer_selection() {
        // Smoke test: both protocols produce a URL rooted at the embed path.
        let request = SigningRequest {
            embed_path: "https://app.example.com/embed/abc".to_string(),
            client_id: "C1".to_string(),
            secret: crate::config::Secret::new("s3cr3t"),
            email: "a@b.com".to_string(),
            external_user_id: "1".to_string(),
            teams: "T1".to_string(),
            account_type: "embedUser".to_string(),
            session_length: 3600,
            mode: "userbacked".to_string(),
        };

        for protocol in [Protocol::Query, Protocol::Jwt] {
            let signer = signer_for(protocol);
            let url = signer.sign(&request).unwrap();
            assert!(url.starts_with("https://app.example.com/embed/abc?"));
        }
    }
}
