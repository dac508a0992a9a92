//! Locating and reading authsession.toml

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::Config;

pub const CONFIG_FILENAME: &str = "authsession.toml";

/// `${NAME}` or `${NAME:-fallback}`
static ENV_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(?P<name>[A-Z_][A-Z0-9_]*)(?::-(?P<fallback>[^}]*))?\}")
        .expect("env reference pattern is valid")
});

/// Load the nearest authsession.toml above the working directory
pub fn load_config() -> Result<Config> {
    let cwd = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;
    let path = nearest_config(&cwd).ok_or(Error::ConfigNotFound)?;
    load_config_from_path(&path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::ConfigNotFound),
        Err(e) => return Err(e.into()),
    };
    tracing::debug!("Loading config from {}", path.display());
    Ok(toml::from_str(&expand_env(&raw))?)
}

/// Load from an explicit path, or search for authsession.toml and fall back
/// to defaults when there is none
pub fn load_config_or_default(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => load_config_from_path(path),
        None => match load_config() {
            Err(Error::ConfigNotFound) => {
                tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
                Ok(Config::default())
            }
            loaded => loaded,
        },
    }
}

fn nearest_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

/// Substitute environment references; unset variables take their fallback
/// or become empty
fn expand_env(raw: &str) -> Cow<'_, str> {
    ENV_REFERENCE.replace_all(raw, |caps: &Captures| {
        env::var(&caps["name"]).unwrap_or_else(|_| {
            caps.name("fallback")
                .map_or_else(String::new, |m| m.as_str().to_string())
        })
    })
}

/// Template written by `authsession init`
pub fn default_config_content() -> &'static str {
    r#"# authsession configuration

[api]
base_url = "${AUTHSESSION_API_URL:-http://localhost:3900/api}"
auth_path = "/auth"
token_header = "x-auth-token"
timeout_secs = 30

[storage]
# path = "/home/me/.local/share/authsession/storage.json"
session_key = "token"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_expand_env_reference() {
        env::set_var("AUTHSESSION_TEST_VAR", "hello");
        assert_eq!(
            expand_env("value = \"${AUTHSESSION_TEST_VAR}\""),
            "value = \"hello\""
        );
        env::remove_var("AUTHSESSION_TEST_VAR");
    }

    #[test]
    fn test_expand_env_fallback_and_unset() {
        assert_eq!(
            expand_env("a = \"${AUTHSESSION_UNSET_VAR:-fallback}\", b = \"${AUTHSESSION_UNSET_VAR}\""),
            "a = \"fallback\", b = \"\""
        );
    }

    #[test]
    fn test_default_content_parses() {
        let config: Config =
            toml::from_str(&expand_env(default_config_content())).expect("Default config should parse");
        assert_eq!(config.api.auth_path, "/auth");
        assert_eq!(config.storage.session_key, "token");
    }

    #[test]
    fn test_nearest_config_searches_ancestors() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(nearest_config(&nested), None);

        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        assert_eq!(
            nearest_config(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_load_missing_path_is_config_not_found() {
        let result = load_config_from_path(Path::new("/nonexistent/authsession.toml"));
        assert!(matches!(result, Err(Error::ConfigNotFound)));
    }

    #[test]
    fn test_explicit_path_is_not_defaulted() {
        let result = load_config_or_default(Some(Path::new("/nonexistent/authsession.toml")));
        assert!(result.is_err());
    }
}
