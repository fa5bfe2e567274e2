//! Shared embed secret handling.
//!
//! The secret signs every credential this crate produces. It must never
//! reach logs or output, so it lives in a newtype whose `Debug`
//! implementation redacts the value.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::SignerError;

/// A shared signing secret.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Load a secret from a file.
    ///
    /// Security: Verifies the file has restrictive permissions (0600 or 0400)
    /// before loading to prevent secrets from being readable by other users.
    /// Surrounding whitespace is trimmed so trailing newlines do not end up
    /// in the HMAC key.
    pub fn load(path: &Path) -> Result<Self, SignerError> {
        let metadata = std::fs::metadata(path).map_err(|e| SignerError::Config {
            message: format!(
                "Failed to read secret metadata from {}: {}",
                path.display(),
                e
            ),
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = metadata.permissions().mode();
            // Check that group and world bits are all zero (only owner can access)
            if mode & 0o077 != 0 {
                return Err(SignerError::Config {
                    message: format!(
                        "Secret file {} has insecure permissions {:04o}, expected 0600 or 0400",
                        path.display(),
                        mode & 0o777
                    ),
                });
            }
        }

        let contents = std::fs::read_to_string(path).map_err(|e| SignerError::Config {
            message: format!("Failed to read secret from {}: {}", path.display(), e),
        })?;

        Ok(Self(contents.trim().to_string()))
    }

    /// The raw secret bytes, used as the HMAC key.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_value() {
        let secret = Secret::new("s3cr3t");
        let formatted = format!("{:?}", secret);
        assert!(!formatted.contains("s3cr3t"));
        assert!(formatted.contains("REDACTED"));
    }

    #[test]
    fn test_as_bytes() {
        let secret = Secret::new("abc");
        assert_eq!(secret.as_bytes(), b"abc");
        assert!(!secret.is_empty());
        assert!(Secret::new("").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_load_rejects_insecure_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embed.key");
        std::fs::write(&path, "topsecret\n").unwrap();

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(Secret::load(&path).is_err());

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).unwrap();
        let secret = Secret::load(&path).unwrap();
        assert_eq!(secret.as_bytes(), b"topsecret");
    }
}
