//! Locally CLI
//!
//! Drives the account core the way the app's forms do:
//! - Sign up and log in
//! - Show the current session
//! - Check page access
//! - List accounts and match candidates

use anyhow::Context;
use clap::{Parser, Subcommand};
use locally::account::{Account, AccountError, AuthService, Role};
use locally::config::{generate_default_config, Config, LoggingConfig};
use locally::navigation::{gate_path, Access, FeedPreference, FeedSelection, Page};
use locally::storage::{open_backend, BackendKind, StateBackend};
use locally::match_candidates;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "locally")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Accounts and sessions for the Locally demo")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/locally/config.toml, ./locally.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the state directory
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Override the state backend (file, sqlite, memory)
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new account and log in as it
    Register {
        /// performer, venue or local
        #[arg(short, long)]
        role: Role,
        username: String,
        password: String,
        /// Profile fields in key=value format (e.g. genre=Jazz)
        #[arg(short = 'F', long = "field")]
        fields: Vec<String>,
    },

    /// Log in
    Login { username: String, password: String },

    /// Log out
    Logout,

    /// Show the logged-in account
    Whoami,

    /// List registered accounts
    Accounts,

    /// List match candidates for the logged-in account
    Matches,

    /// Check whether the current visitor may open a page
    Visit {
        /// Page file name or path, e.g. match.html
        page: String,
    },

    /// Show or switch the local-home feed
    Feed {
        /// for-you or following
        selection: Option<FeedSelection>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }

    init_logging(&config.logging);

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let storage = config.storage.backend_config();
    tracing::debug!("State backend: {} at {:?}", storage.kind, storage.data_dir);
    let backend = open_backend(&storage)
        .with_context(|| format!("opening {} state at {:?}", storage.kind, storage.data_dir))?;

    let json = cli.format == "json";
    match run(cli.command, &*backend, json) {
        Err(e) => match e.downcast_ref::<AccountError>() {
            Some(account_err) if account_err.is_recoverable() => {
                eprintln!("{}", account_err);
                std::process::exit(1);
            }
            _ => Err(e),
        },
        ok => ok,
    }
}

fn run(command: Commands, backend: &dyn StateBackend, json: bool) -> anyhow::Result<()> {
    let auth = AuthService::new(backend);

    match command {
        Commands::Register {
            role,
            username,
            password,
            fields,
        } => {
            let mut account = Account::new(username, password, role);
            for field in fields {
                match field.split_once('=') {
                    Some((k, v)) => account = account.field(k.trim(), v.trim()),
                    None => anyhow::bail!("Invalid field `{}`, expected key=value", field),
                }
            }
            let unknown: Vec<&str> = account
                .profile()
                .map(|(k, _)| k)
                .filter(|k| !role.profile_fields().contains(k))
                .collect();
            if !unknown.is_empty() {
                tracing::debug!("Extra profile fields for {}: {:?}", role, unknown);
            }

            let landing = match auth.sign_up(account) {
                Ok(landing) => landing,
                Err(e @ AccountError::UsernameTaken) => {
                    println!("Staying on {}", Page::sign_up_for(role));
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            };
            println!(
                "Registered {} ({}), continue to {}",
                landing.account.username, landing.account.role, landing.page
            );
        }

        Commands::Login { username, password } => {
            // Form input arrives with stray whitespace; stored credentials don't
            let landing = auth.log_in(username.trim(), password.trim())?;
            println!(
                "Logged in as {} ({}), continue to {}",
                landing.account.display_name(),
                landing.account.role,
                landing.page
            );
        }

        Commands::Logout => {
            let page = auth.log_out()?;
            println!("Logged out, continue to {}", page);
        }

        Commands::Whoami => match auth.current_account() {
            Some(account) if json => print_json(&account)?,
            Some(account) => print_accounts(&[&account]),
            None => println!("Not logged in."),
        },

        Commands::Accounts => {
            let accounts = auth.list_accounts();
            if json {
                print_json(&accounts)?;
            } else if accounts.is_empty() {
                println!("No accounts registered yet.");
                println!();
                println!("Create one with:");
                println!("  locally register --role performer <username> <password>");
            } else {
                print_accounts(&accounts.iter().collect::<Vec<_>>());
            }
        }

        Commands::Matches => {
            let Some(viewer) = auth.current_account() else {
                println!("Not logged in, continue to index.html");
                std::process::exit(1);
            };
            let accounts = auth.list_accounts();
            let candidates = match_candidates(&viewer, &accounts);

            if json {
                print_json(&candidates)?;
            } else if candidates.is_empty() {
                println!("No matches yet.");
            } else {
                print_accounts(&candidates);
            }
        }

        Commands::Visit { page } => {
            let current = auth.current_account();
            match gate_path(current.as_ref(), &page) {
                Access::Allow => println!("Allowed: {}", page),
                Access::Redirect(to) => {
                    println!("Redirect: {} -> {}", page, to);
                    std::process::exit(1);
                }
            }
        }

        Commands::Feed { selection } => {
            let feed = FeedPreference::new(backend);
            match selection {
                Some(selection) => {
                    let page = feed.switch(selection)?;
                    println!("Feed {}, continue to {}", selection, page);
                }
                None => println!("{}", feed.selection()),
            }
        }

        Commands::Config { .. } => unreachable!("handled before the backend is opened"),
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("locally={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_accounts(accounts: &[&Account]) {
    println!("{:<16} {:<10} {:<24} {}", "Username", "Role", "Name", "Location");
    println!("{}", "-".repeat(64));

    for account in accounts {
        println!(
            "{:<16} {:<10} {:<24} {}",
            account.username,
            account.role,
            account.display_name(),
            account.get("location").unwrap_or("-")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locally::storage::MemoryBackend;

    fn register(backend: &MemoryBackend, role: Role, username: &str, password: &str) -> anyhow::Result<()> {
        run(
            Commands::Register {
                role,
                username: username.to_string(),
                password: password.to_string(),
                fields: vec!["genre=Jazz".to_string()],
            },
            backend,
            false,
        )
    }

    #[test]
    fn test_login_trims_form_input() {
        let backend = MemoryBackend::new();
        register(&backend, Role::Performer, "sam", "pw1").unwrap();
        run(Commands::Logout, &backend, false).unwrap();

        run(
            Commands::Login {
                username: " sam ".to_string(),
                password: "pw1\n".to_string(),
            },
            &backend,
            false,
        )
        .unwrap();

        let current = AuthService::new(&backend).current_account().unwrap();
        assert_eq!(current.username, "sam");
        assert_eq!(current.get("genre"), Some("Jazz"));
    }

    #[test]
    fn test_login_wrong_password_is_recoverable() {
        let backend = MemoryBackend::new();
        register(&backend, Role::Local, "kim", "pw").unwrap();

        let err = run(
            Commands::Login {
                username: "kim".to_string(),
                password: "nope".to_string(),
            },
            &backend,
            false,
        )
        .unwrap_err();
        let err = err.downcast_ref::<AccountError>().unwrap();
        assert!(matches!(err, AccountError::InvalidCredentials));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_register_duplicate_keeps_first_account() {
        let backend = MemoryBackend::new();
        register(&backend, Role::Venue, "blue", "pw1").unwrap();

        let err = register(&backend, Role::Local, "blue", "pw2").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AccountError>(),
            Some(AccountError::UsernameTaken)
        ));

        let auth = AuthService::new(&backend);
        assert_eq!(auth.list_accounts().len(), 1);
        assert_eq!(auth.current_account().unwrap().role, Role::Venue);
    }
}
