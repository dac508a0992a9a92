//! CLI command implementations

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::auth::SessionManager;
use crate::cli::{format_state, info, print_claims_table, success, warn, OutputFormat};
use crate::config::{self, loader::CONFIG_FILENAME, Config};

/// Initialize a new authsession.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Set [api] base_url and run 'authsession login --email <email>'");

    Ok(())
}

/// Log in with email and password
pub async fn login(config_path: Option<&Path>, email: &str, password: Option<String>) -> Result<()> {
    let config = load_config(config_path)?;
    let session = SessionManager::bootstrap(&config)?;

    let password = match password {
        Some(password) => password,
        None => dialoguer::Password::new()
            .with_prompt(format!("Password for {}", email))
            .interact()?,
    };

    session
        .login(email, &password)
        .await
        .with_context(|| format!("Login as {} failed", email))?;
    success(&format!("Logged in as {}", email));

    Ok(())
}

/// Store a token obtained out-of-band
pub async fn login_jwt(config_path: Option<&Path>, token: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let session = SessionManager::bootstrap(&config)?;

    session.login_with_jwt(token)?;
    success("Token stored");
    if session.current_user().is_none() {
        warn("Stored token could not be decoded; 'whoami' will report no user");
    }

    Ok(())
}

/// Remove the stored token
pub async fn logout(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let session = SessionManager::bootstrap(&config)?;

    session.logout()?;
    success("Logged out");

    Ok(())
}

/// Show the current user's claims
pub async fn whoami(config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let session = SessionManager::bootstrap(&config)?;

    let Some(user) = session.current_user() else {
        info("Not logged in");
        return Ok(());
    };

    match format {
        OutputFormat::Table => {
            print_claims_table(&user);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&user)?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&user)?;
            println!("{}", yaml);
        }
    }

    Ok(())
}

/// Print the raw stored token
pub async fn token(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let session = SessionManager::bootstrap(&config)?;

    match session.jwt() {
        Some(jwt) => {
            println!("{}", jwt);
            Ok(())
        }
        None => bail!("Not logged in"),
    }
}

/// Report whether the current user is an administrator
pub async fn is_admin(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let session = SessionManager::bootstrap(&config)?;

    println!("{}", session.is_admin());

    Ok(())
}

/// Show session state and storage location
pub async fn status(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let session = SessionManager::bootstrap(&config)?;

    println!("{}", "Session".bold().underline());
    println!();
    println!("  {} {}", "State:".bold(), format_state(session.state()));
    println!(
        "  {} {}",
        "Storage:".bold(),
        session.store().path().display()
    );
    println!("  {} {}", "Key:".bold(), session.session_key());
    println!("  {} {}", "API:".bold(), session.transport().base_url().cyan());

    if let Some(user) = session.current_user() {
        if let Some(name) = user.name().or(user.email()) {
            println!("  {} {}", "User:".bold(), name);
        }
        if let Some(exp) = user.expires_at() {
            println!(
                "  {} {}",
                "Expires:".bold(),
                exp.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        println!("  {} {}", "Admin:".bold(), user.is_admin());
    }

    Ok(())
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    config::load_config_or_default(config_path).map_err(|e| e.into())
}
