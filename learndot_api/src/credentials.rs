//! API token discovery.
//!
//! The token comes from `LEARNDOT_TOKEN` when set, otherwise from
//! `~/.learndot_token`. Failing both is fatal at client construction.

use std::path::{Path, PathBuf};

use crate::Error;

/// Environment variable holding the API token.
pub const TOKEN_ENV_VAR: &str = "LEARNDOT_TOKEN";

/// Token file name, relative to the home directory.
pub const TOKEN_FILE_NAME: &str = ".learndot_token";

/// Resolves the API token from the environment or the default token file.
pub fn resolve_token() -> Result<String, Error> {
    resolve_token_from(
        |key| std::env::var(key).ok(),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

/// Resolves the API token using `env` for variable lookup and `home` as the
/// directory holding the token file.
pub fn resolve_token_from(
    env: impl Fn(&str) -> Option<String>,
    home: Option<PathBuf>,
) -> Result<String, Error> {
    if let Some(token) = env(TOKEN_ENV_VAR) {
        return validate(token, TOKEN_ENV_VAR);
    }
    let path = home.map(|home| home.join(TOKEN_FILE_NAME)).ok_or_else(|| {
        Error::Credential(format!(
            "{} is not set and no home directory is available",
            TOKEN_ENV_VAR
        ))
    })?;
    read_token_file(&path)
}

/// Reads and trims a token file.
pub fn read_token_file(path: &Path) -> Result<String, Error> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!("Failed to read token file {}: {}", path.display(), e);
        Error::Credential(format!(
            "API token (in {} or {}) not readable",
            TOKEN_ENV_VAR,
            path.display()
        ))
    })?;
    validate(contents, &path.display().to_string())
}

fn validate(token: String, source: &str) -> Result<String, Error> {
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::Credential(format!("API token from {} is empty", source)));
    }
    Ok(token.to_string())
}
