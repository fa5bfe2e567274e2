//! Configuration module for the embed signer.
//!
//! Handles loading and validating signer configuration from TOML files.

mod secret;
mod settings;

pub use secret::Secret;
pub use settings::*;
