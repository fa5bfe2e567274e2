//! The input to a signing operation.

use crate::config::{Secret, Settings};
use crate::error::{SignerError, SignerResult, ValidationErrorKind};

/// Everything a signer needs to authorize one embed session.
///
/// Identity, session, and routing fields are plain strings supplied by the
/// caller; the secret is held in its redacting newtype and never appears in
/// the produced URL.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// Base URL of the embed target.
    pub embed_path: String,
    /// Embed client ID; also the JWT issuer and key identifier.
    pub client_id: String,
    /// Shared signing secret.
    pub secret: Secret,
    /// User's email address; the JWT subject.
    pub email: String,
    /// User's external ID.
    pub external_user_id: String,
    /// Comma-separated team names.
    pub teams: String,
    /// Account type, passed through uninterpreted by the JWT protocol.
    pub account_type: String,
    /// Requested credential lifetime in seconds.
    pub session_length: i64,
    /// Embedding mode.
    pub mode: String,
}

impl SigningRequest {
    /// Build a request from loaded settings.
    pub fn from_settings(settings: &Settings, secret: Secret) -> Self {
        Self {
            embed_path: settings.embed.embed_path.clone(),
            client_id: settings.embed.client_id.clone(),
            secret,
            email: settings.user.email.clone(),
            external_user_id: settings.user.external_user_id.clone(),
            teams: settings.user.teams.clone(),
            account_type: settings.user.account_type.clone(),
            session_length: settings.session.session_length,
            mode: settings.session.mode.clone(),
        }
    }

    /// Check required fields before any signing attempt.
    ///
    /// Team and mode may be empty; secret, client id, email, and the embed
    /// path may not.
    pub fn validate(&self) -> SignerResult<()> {
        for (field, empty) in [
            ("embed_path", self.embed_path.is_empty()),
            ("client_id", self.client_id.is_empty()),
            ("secret", self.secret.is_empty()),
            ("email", self.email.is_empty()),
        ] {
            if empty {
                return Err(SignerError::Validation {
                    kind: ValidationErrorKind::MissingField {
                        field: field.to_string(),
                    },
                });
            }
        }
        Ok(())
    }

    /// Parse the comma-separated team list into ordered team names.
    ///
    /// Entries are trimmed and empty entries are dropped, so `"a,b,,c"`
    /// yields `["a", "b", "c"]` and an empty input yields an empty list
    /// rather than a single empty name.
    pub fn parse_teams(&self) -> Vec<String> {
        self.teams
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}
