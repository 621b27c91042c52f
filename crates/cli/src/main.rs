//! CMS Starter CLI - migrations and a terminal frontend for the CMS API.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! cms-cli migrate
//!
//! # Log in and persist the session
//! cms-cli auth login -i editor@example.com -p secret
//!
//! # Register a new end user
//! cms-cli auth register -u editor -e editor@example.com -p secret
//!
//! # Show or clear the stored session
//! cms-cli auth whoami
//! cms-cli auth logout
//!
//! # Print the home page content
//! cms-cli home
//! ```
//!
//! # Environment Variables
//!
//! - `CMS_API_URL` - Backend origin (default: `http://localhost:1337`)
//! - `CMS_SESSION_FILE` - Session file (default: `.cms-session.json`)
//! - `CMS_DATABASE_URL` - `PostgreSQL` connection string, `migrate` only

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cms-cli")]
#[command(author, version, about = "CMS Starter CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage the local auth session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Print the home page content
    Home,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Log in with an email or username
    Login {
        /// Email or username
        #[arg(short, long)]
        identifier: String,

        #[arg(short, long)]
        password: String,
    },
    /// Register a new end user
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the stored user
    Whoami,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Auth { action } => {
            let session = commands::auth::session()?;
            match action {
                AuthAction::Login {
                    identifier,
                    password,
                } => commands::auth::login(session, &identifier, &password).await?,
                AuthAction::Register {
                    username,
                    email,
                    password,
                } => commands::auth::register(session, &username, &email, &password).await?,
                AuthAction::Logout => commands::auth::logout(session).await?,
                AuthAction::Whoami => commands::auth::whoami(session).await?,
            }
        }
        Commands::Home => commands::home::show().await?,
    }
    Ok(())
}
