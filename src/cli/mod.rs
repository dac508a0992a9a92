//! CLI interface for authsession

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "authsession")]
#[command(version)]
#[command(about = "Log in against a remote auth endpoint and manage the stored session token", long_about = None)]
pub struct Cli {
    /// Path to authsession.toml (searched upward from the current directory by default)
    #[arg(short, long, global = true, env = "AUTHSESSION_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new authsession.toml configuration file
    Init,

    /// Log in with email and password and store the returned token
    Login {
        #[arg(short, long)]
        email: String,

        /// Prompted for when omitted
        #[arg(short, long, env = "AUTHSESSION_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Store a token obtained out-of-band (e.g. from a redirect callback)
    LoginJwt {
        /// The token to store
        token: String,
    },

    /// Remove the stored token
    Logout,

    /// Show the current user's claims
    Whoami {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the raw stored token
    Token,

    /// Report whether the current user is an administrator
    IsAdmin,

    /// Show session state and storage location
    Status,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
