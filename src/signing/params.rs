//! Ordered query parameters and their serialization.
//!
//! The query-signing protocol signs the exact serialized byte sequence, so
//! parameter order is significant and the percent-encoding rule is fixed:
//! `:` and `,` stay unescaped (parameter names carry a leading `:` and team
//! lists are comma-joined), everything outside the RFC 3986 unreserved set
//! is percent-encoded.

/// An insertion-ordered set of query parameters.
#[derive(Debug, Default)]
pub struct CanonicalParams {
    pairs: Vec<(String, String)>,
}

impl CanonicalParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. Order of insertion is order of serialization.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Serialize to `name=value&name=value`, encoding both sides.
    pub fn serialize(&self) -> String {
        self.pairs
            .iter()
            .map(|(name, value)| format!("{}={}", encode_component(name), encode_component(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Percent-encode a query component, leaving `:` and `,` unescaped.
///
/// Non-ASCII input is encoded byte-by-byte as UTF-8.
pub fn encode_component(value: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b':' | b',' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push('%');
                encoded.push(HEX[(byte >> 4) as usize] as char);
                encoded.push(HEX[(byte & 0x0f) as usize] as char);
            }
        }
    }
    encoded
}
