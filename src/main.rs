//! Embed Signer - generates a signed embed URL from a TOML configuration.

use std::env;
use std::process::ExitCode;

use tracing::{debug, error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use embed_signer::config::Settings;
use embed_signer::signing::{signer_for, SigningRequest};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

const DEFAULT_CONFIG_PATH: &str = "/etc/embed-signer/config.toml";

fn main() -> ExitCode {
    // Parse command line arguments (simple std::env approach)
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", NAME, VERSION);
        return ExitCode::SUCCESS;
    }

    let config_path = get_config_path(&args);

    // Load configuration
    let settings = match Settings::load(&config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging based on configuration
    if let Err(e) = init_logging(&settings) {
        eprintln!("Error initializing logging: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting {} v{}", NAME, VERSION);
    info!("Configuration loaded from: {}", config_path);
    debug!(
        embed_path = %settings.embed.embed_path,
        client_id = %settings.embed.client_id,
        protocol = ?settings.embed.protocol,
        session_length = settings.session.session_length,
        mode = %settings.session.mode,
        "signer configuration"
    );

    let secret = match settings.resolve_secret() {
        Ok(secret) => secret,
        Err(e) => {
            error!(error = %e, "Failed to resolve embed secret");
            return ExitCode::FAILURE;
        }
    };

    let request = SigningRequest::from_settings(&settings, secret);
    let signer = signer_for(settings.embed.protocol);

    match signer.sign(&request) {
        Ok(url) => {
            println!("{}", url);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Failed to sign embed URL");
            ExitCode::FAILURE
        }
    }
}

/// Get the config file path from --config or the default location.
fn get_config_path(args: &[String]) -> String {
    args.iter()
        .position(|a| a == "--config" || a == "-c")
        .and_then(|i| args.get(i + 1))
        .cloned()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Initialize logging. The signed URL goes to stdout, so all log output
/// is written to stderr.
fn init_logging(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    if settings.logging.format.eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}

fn print_help() {
    println!("{} {}", NAME, VERSION);
    println!("Generates a signed embed URL from a TOML configuration.");
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS]", NAME);
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>    Config file [default: {}]", DEFAULT_CONFIG_PATH);
    println!("    -h, --help             Print help");
    println!("    -V, --version          Print version");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_path_default() {
        let args = vec!["embed-signer".to_string()];
        assert_eq!(get_config_path(&args), DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn test_get_config_path_flag() {
        let args = vec![
            "embed-signer".to_string(),
            "--config".to_string(),
            "/tmp/c.toml".to_string(),
        ];
        assert_eq!(get_config_path(&args), "/tmp/c.toml");
    }
}
