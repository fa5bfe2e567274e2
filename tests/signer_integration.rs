//! Integration tests for the embed signer.
//!
//! These tests exercise the full path from a TOML configuration file to a
//! signed URL and verify the produced credentials by independent
//! recomputation of the signatures.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::hmac;
use serde_json::Value;
use tempfile::TempDir;

use embed_signer::config::{Protocol, Secret, Settings};
use embed_signer::signing::{
    signer_for, CredentialSigner, FixedClock, FixedNonceSource, QuerySigner, SigningRequest,
    TokenSigner,
};

const NOW: i64 = 1_700_000_000;

fn scenario_request() -> SigningRequest {
    SigningRequest {
        embed_path: "https://x.test/embed".to_string(),
        client_id: "C1".to_string(),
        secret: Secret::new("s3cr3t"),
        email: "a@b.com".to_string(),
        external_user_id: "1".to_string(),
        teams: "T1".to_string(),
        account_type: "embedUser".to_string(),
        session_length: 3600,
        mode: "userbacked".to_string(),
    }
}

fn fixed_query_signer(nonce: &str) -> QuerySigner {
    QuerySigner::with_sources(
        Box::new(FixedNonceSource(nonce.to_string())),
        Box::new(FixedClock(NOW)),
    )
}

/// The concrete scenario: URL starts at the embed path with the nonce
/// parameter and ends with a 64-hex-char signature that recomputes exactly
/// over the preceding substring.
#[test]
fn query_url_scenario_round_trips() {
    let request = scenario_request();
    let url = fixed_query_signer("n-1").sign(&request).unwrap();

    assert!(url.starts_with("https://x.test/embed?:nonce="));

    let (signed_portion, signature) = url.split_once("&:signature=").unwrap();
    assert_eq!(signature.len(), 64);
    assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));

    let key = hmac::Key::new(hmac::HMAC_SHA256, b"s3cr3t");
    let recomputed = hex::encode(hmac::sign(&key, signed_portion.as_bytes()).as_ref());
    assert_eq!(signature, recomputed);
}

/// Two calls with the same inputs differ only through nonce and timestamp,
/// and therefore produce different signatures.
#[test]
fn repeated_calls_produce_different_signatures() {
    let request = scenario_request();
    let signer = QuerySigner::new();

    let first = signer.sign(&request).unwrap();
    let second = signer.sign(&request).unwrap();
    assert_ne!(first, second);
    assert_ne!(
        first.split(":signature=").last(),
        second.split(":signature=").last()
    );

    let token_signer = TokenSigner::new();
    let first = token_signer.sign(&request).unwrap();
    let second = token_signer.sign(&request).unwrap();
    assert_ne!(first, second);
}

/// Spaces percent-encode while colons and commas pass through unescaped.
#[test]
fn query_url_encoding_properties() {
    let mut request = scenario_request();
    request.teams = "Sales Team,T2".to_string();
    let url = fixed_query_signer("n-1").sign(&request).unwrap();

    assert!(url.contains(":external_user_team=Sales%20Team,T2"));
    // Parameter names keep their leading colon
    assert!(url.contains("&:email=a%40b.com&"));
    assert!(!url.contains("%3A"));
}

#[test]
fn jwt_claims_and_signature_verify() {
    let request = scenario_request();
    let signer = TokenSigner::with_sources(
        Box::new(FixedNonceSource("jti-1".to_string())),
        Box::new(FixedClock(NOW)),
    );
    let url = signer.sign(&request).unwrap();

    assert!(url.starts_with("https://x.test/embed?:embed=true&:jwt="));
    let token = url.split(":jwt=").nth(1).unwrap();
    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3);

    let header: Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[0]).unwrap()).unwrap();
    assert_eq!(header["alg"], "HS256");
    assert_eq!(header["kid"], "C1");

    let claims: Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[1]).unwrap()).unwrap();
    assert_eq!(claims["sub"], "a@b.com");
    assert_eq!(claims["iss"], "C1");
    assert_eq!(claims["iat"], NOW);
    assert_eq!(claims["exp"], NOW + 3600);

    let key = hmac::Key::new(hmac::HMAC_SHA256, b"s3cr3t");
    let signing_input = format!("{}.{}", segments[0], segments[1]);
    let signature = URL_SAFE_NO_PAD.decode(segments[2]).unwrap();
    assert!(hmac::verify(&key, signing_input.as_bytes(), &signature).is_ok());
}

#[test]
fn jwt_session_length_policy() {
    let signer = TokenSigner::with_sources(
        Box::new(FixedNonceSource("jti-1".to_string())),
        Box::new(FixedClock(NOW)),
    );

    let exp_of = |session_length: i64| {
        let mut request = scenario_request();
        request.session_length = session_length;
        let url = signer.sign(&request).unwrap();
        let token = url.split(":jwt=").nth(1).unwrap();
        let claims: Value = serde_json::from_slice(
            &URL_SAFE_NO_PAD
                .decode(token.split('.').nth(1).unwrap())
                .unwrap(),
        )
        .unwrap();
        claims["exp"].as_i64().unwrap()
    };

    // Capped at 30 days
    assert_eq!(exp_of(99_999_999), NOW + 2_592_000);
    // Negative input issues an already-expired credential without error
    assert!(exp_of(-100) < NOW);
    assert_eq!(exp_of(-100), NOW - 100);
}

/// Full path: config file on disk with a permission-checked secret file,
/// through protocol selection, to a verifiable URL.
#[test]
fn config_file_to_signed_url() {
    let dir = TempDir::new().unwrap();

    let secret_path = dir.path().join("embed.key");
    std::fs::write(&secret_path, "s3cr3t\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&secret_path, std::fs::Permissions::from_mode(0o600)).unwrap();
    }

    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
            [embed]
            embed_path = "https://x.test/embed"
            client_id = "C1"
            protocol = "query"
            secret_path = "{}"

            [user]
            email = "a@b.com"
            teams = "T1"
            "#,
            secret_path.display()
        ),
    )
    .unwrap();

    let settings = Settings::load(&config_path).unwrap();
    assert_eq!(settings.embed.protocol, Protocol::Query);

    let secret = settings.resolve_secret().unwrap();
    // Trailing newline in the secret file must not reach the HMAC key
    assert_eq!(secret.as_bytes(), b"s3cr3t");

    let request = SigningRequest::from_settings(&settings, secret);
    let url = signer_for(settings.embed.protocol).sign(&request).unwrap();

    let (signed_portion, signature) = url.split_once("&:signature=").unwrap();
    let key = hmac::Key::new(hmac::HMAC_SHA256, b"s3cr3t");
    let recomputed = hex::encode(hmac::sign(&key, signed_portion.as_bytes()).as_ref());
    assert_eq!(signature, recomputed);
}

/// Missing required fields fail before any signing attempt, on both paths.
#[test]
fn missing_required_fields_are_hard_errors() {
    for clear in [
        |r: &mut SigningRequest| r.email.clear(),
        |r: &mut SigningRequest| r.client_id.clear(),
        |r: &mut SigningRequest| r.embed_path.clear(),
        |r: &mut SigningRequest| r.secret = Secret::new(""),
    ] {
        let mut request = scenario_request();
        clear(&mut request);
        assert!(QuerySigner::new().sign(&request).is_err());
        assert!(TokenSigner::new().sign(&request).is_err());
    }
}
