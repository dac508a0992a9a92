use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authsession::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authsession=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Login { email, password } => cli::commands::login(config, &email, password).await,
        Commands::LoginJwt { token } => cli::commands::login_jwt(config, &token).await,
        Commands::Logout => cli::commands::logout(config).await,
        Commands::Whoami { format } => cli::commands::whoami(config, format).await,
        Commands::Token => cli::commands::token(config).await,
        Commands::IsAdmin => cli::commands::is_admin(config).await,
        Commands::Status => cli::commands::status(config).await,
    }
}
