//! pawgate - staff dashboard authentication gateway

use clap::{Parser, Subcommand};
use pawgate::auth::password::hash_password;
use pawgate::config::DEFAULT_CONFIG_PATH;
use pawgate::server;
use pawgate::utils::logging::init_tracing;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "pawgate", version, about = "Staff dashboard authentication gateway")]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "PAWGATE_CONFIG", default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the Argon2 hash of a password for a seed identity
    HashPassword {
        /// Plaintext password
        password: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::HashPassword { password } => hash_password(&password).map(|hash| {
            println!("{}", hash);
        }),
        Command::Serve => serve(&cli.config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config_path: &str) -> pawgate::Result<()> {
    let config = server::builder::load_config(config_path).await?;
    init_tracing(&config.logging)?;
    info!("Configuration loaded from {}", config_path);

    server::run_server(config).await
}
