//! PLC client CLI - log in, manage and inspect the stored session credential.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use plc_core::auth::{FileStore, KeyringStore, SessionError, SessionManager, SessionState, TokenStore};
use plc_core::ApiConfig;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "plc", version, about = "Log in to the PLC platform and manage the stored session")]
struct Cli {
    /// Where the session credential is kept
    #[arg(long, value_enum, env = "PLC_STORE", default_value_t = StoreKind::File)]
    store: StoreKind,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    File,
    Keyring,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Email a one-time login link
    RequestLink { email: String },
    /// Complete login from a login link
    OpenLink { url: String },
    /// Show whether a live session is stored
    Status,
    /// Forget the stored session
    Logout,
    /// Print the Authorization header for the live session
    Header,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn open_store(kind: StoreKind, config: &ApiConfig) -> Result<Arc<dyn TokenStore>> {
    let store: Arc<dyn TokenStore> = match kind {
        StoreKind::File => {
            let dir = ApiConfig::data_dir()?;
            let store = FileStore::new(dir, &config.storage_key);
            debug!(path = %store.path().display(), "Using file credential store");
            Arc::new(store)
        }
        StoreKind::Keyring => Arc::new(KeyringStore::new(&config.storage_key)),
    };
    Ok(store)
}

fn describe_state(state: SessionState) -> String {
    match state {
        SessionState::Unauthenticated => "Not logged in".to_string(),
        SessionState::Authenticated { expires_at: None } => "Logged in (no expiry)".to_string(),
        SessionState::Authenticated {
            expires_at: Some(expires_at),
        } => format!("Logged in until {}", expires_at.format("%Y-%m-%d %H:%M:%S UTC")),
    }
}

/// Render a session failure for the terminal, keeping the server payload.
fn explain(err: SessionError) -> anyhow::Error {
    match err.payload() {
        Some(payload) => {
            let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
            anyhow::anyhow!("{}\n{}", err, pretty)
        }
        None => err.into(),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

async fn run(cli: Cli) -> Result<()> {
    let config = ApiConfig::load().context("Failed to load configuration")?;
    let store = open_store(cli.store, &config)?;
    let session = SessionManager::new(config, store)?;

    match cli.command {
        Command::Login { email } => {
            let email = match email {
                Some(email) => email,
                None => prompt("Email: ")?,
            };
            let password = rpassword::prompt_password("Password: ")?;

            eprintln!("Authenticating...");
            session.authenticate(&email, &password).await.map_err(explain)?;
            println!("Login successful");
        }
        Command::RequestLink { email } => {
            session.request_login_link(&email).await.map_err(explain)?;
            println!("Login link sent to {}", email);
        }
        Command::OpenLink { url } => {
            session.authenticate_from_link(&url).map_err(explain)?;
            println!("Login successful");
        }
        Command::Status => {
            println!("{}", describe_state(session.state()));
        }
        Command::Logout => {
            session.logout().map_err(explain)?;
            println!("Logged out");
        }
        Command::Header => match session.auth_header() {
            Some(value) => println!("Authorization: {}", value),
            None => anyhow::bail!("Not logged in"),
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing();
    info!("plc starting");

    run(cli).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_parse_login_with_email() {
        let cli = Cli::try_parse_from(["plc", "login", "--email", "donor@example.org"]).unwrap();
        assert_eq!(cli.store, StoreKind::File);
        match cli.command {
            Command::Login { email } => assert_eq!(email.as_deref(), Some("donor@example.org")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_open_link_with_keyring() {
        let cli = Cli::try_parse_from(["plc", "--store", "keyring", "open-link", "https://x/y?plcJwt=T"]).unwrap();
        assert_eq!(cli.store, StoreKind::Keyring);
        assert!(matches!(cli.command, Command::OpenLink { ref url } if url == "https://x/y?plcJwt=T"));
    }

    #[test]
    fn test_request_link_requires_email() {
        assert!(Cli::try_parse_from(["plc", "request-link"]).is_err());
    }

    #[test]
    fn test_describe_state() {
        assert_eq!(describe_state(SessionState::Unauthenticated), "Not logged in");
        assert_eq!(
            describe_state(SessionState::Authenticated { expires_at: None }),
            "Logged in (no expiry)"
        );
        let expires_at = DateTime::from_timestamp(1_900_000_000, 0);
        assert_eq!(
            describe_state(SessionState::Authenticated { expires_at }),
            "Logged in until 2030-03-17 17:46:40 UTC"
        );
    }
}
