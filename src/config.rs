// Client configuration.
//
// Values come from the process environment (a local `.env` is loaded by the
// binary before this runs). When `CODA_ACCESS_KEY` is not set, a token saved
// in `~/.coda_token` is used instead.

use std::path::{Path, PathBuf};

use tracing::debug;

pub const DEFAULT_API_ROOT: &str = "https://coda.io/apis/v1";
pub const DEFAULT_DOC_ID: &str = "A82sLqephK";
pub const TOKEN_FILENAME: &str = ".coda_token";

/// Everything `CodaClient` needs to address the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CodaConfig {
    /// Bearer token. Requests go out unauthenticated when this is `None`.
    pub api_key: Option<String>,
    pub api_root: String,
    pub doc_id: String,
}

impl Default for CodaConfig {
    fn default() -> Self {
        CodaConfig {
            api_key: None,
            api_root: DEFAULT_API_ROOT.to_string(),
            doc_id: DEFAULT_DOC_ID.to_string(),
        }
    }
}

impl CodaConfig {
    /// Read `CODA_ACCESS_KEY`, `CODA_API_ROOT` and `CODA_DOC_ID`.
    pub fn from_env() -> Self {
        let home_token = dirs::home_dir().and_then(|dir| load_token(&dir));
        Self::from_lookup(|key| std::env::var(key).ok(), home_token)
    }

    /// Build from an arbitrary variable lookup, with `fallback_token` used
    /// when no key is set.
    pub fn from_lookup<F>(lookup: F, fallback_token: Option<String>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let api_key = non_empty("CODA_ACCESS_KEY").or(fallback_token);
        if api_key.is_none() {
            debug!("no access key configured, requests will be unauthenticated");
        }
        CodaConfig {
            api_key,
            api_root: non_empty("CODA_API_ROOT")
                .map(|root| root.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_ROOT.to_string()),
            doc_id: non_empty("CODA_DOC_ID").unwrap_or_else(|| DEFAULT_DOC_ID.to_string()),
        }
    }
}

pub fn token_path(dir: &Path) -> PathBuf {
    dir.join(TOKEN_FILENAME)
}

/// Load a token saved in `dir`, ignoring a missing or blank file.
pub fn load_token(dir: &Path) -> Option<String> {
    let data = std::fs::read_to_string(token_path(dir)).ok()?;
    let token = data.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
