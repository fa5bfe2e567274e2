//! Error types for the embed signer.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
