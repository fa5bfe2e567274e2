//! Nonce generation for signed credentials.

use uuid::Uuid;

/// A source of single-use random identifiers.
///
/// Every signed artifact carries one (the `:nonce` parameter or the JWT
/// `jti` claim) so signatures cannot be replayed. The 128 bits of a v4
/// UUID make collisions negligible.
pub trait NonceSource: Send + Sync {
    fn next_nonce(&self) -> String;
}

/// Random v4 UUID nonces.
#[derive(Debug, Default)]
pub struct UuidNonceSource;

impl NonceSource for UuidNonceSource {
    fn next_nonce(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// A source that always returns the same nonce, for deterministic tests.
#[derive(Debug)]
pub struct FixedNonceSource(pub String);

impl NonceSource for FixedNonceSource {
    fn next_nonce(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_nonces_are_unique() {
        let source = UuidNonceSource;
        assert_ne!(source.next_nonce(), source.next_nonce());
    }

    #[test]
    fn test_fixed_nonce() {
        let source = FixedNonceSource("abc123".to_string());
        assert_eq!(source.next_nonce(), "abc123");
        assert_eq!(source.next_nonce(), "abc123");
    }
}
