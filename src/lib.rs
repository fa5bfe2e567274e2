//! Embed Signer Library
//!
//! This crate generates signed URLs that authorize an embedded analytics
//! view for a specific external user over a bounded time window. Two
//! signing protocols are supported: an HMAC-SHA256 signed query string
//! and an HS256 JWT embedded in a fixed-shape URL.

pub mod config;
pub mod error;
pub mod signing;
