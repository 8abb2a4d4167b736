use crate::constants::auth;
use crate::errors::ToolError;
use crate::services::logger::Logger;
use std::path::{Path, PathBuf};

/// Locates private-key material for session authentication.
///
/// An explicit path replaces the entire candidate list: it is tried alone,
/// with no fallback. Without one, the fixed default identity files are tried
/// in order and the first readable file wins. Key format is not validated
/// here; a malformed key surfaces as an authentication failure.
pub struct KeyResolver {
    logger: Logger,
}

impl KeyResolver {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger: logger.child("keys"),
        }
    }

    pub fn resolve(&self, explicit_path: Option<&str>) -> Result<String, ToolError> {
        let candidates: Vec<PathBuf> = match explicit_path {
            Some(path) => vec![expand_home_path(path)],
            None => auth::DEFAULT_KEY_PATHS
                .iter()
                .map(|path| expand_home_path(path))
                .collect(),
        };

        for candidate in &candidates {
            match std::fs::read_to_string(candidate) {
                Ok(key) => {
                    self.logger.debug(
                        "resolved private key",
                        Some(&serde_json::json!({"path": candidate.to_string_lossy()})),
                    );
                    return Ok(key);
                }
                Err(_) => continue,
            }
        }

        let tried: Vec<String> = candidates
            .iter()
            .map(|path| path.to_string_lossy().to_string())
            .collect();
        Err(ToolError::key_resolution(format!(
            "No readable SSH private key. Tried: {}",
            tried.join(", ")
        ))
        .with_details(serde_json::json!({ "tried": tried })))
    }
}

fn expand_home_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if let Some(text) = path.to_str() {
        if let Some(rest) = text.strip_prefix("~/") {
            if let Ok(home) = std::env::var("HOME") {
                return PathBuf::from(home).join(rest);
            }
        }
        if text == "~" {
            if let Ok(home) = std::env::var("HOME") {
                return PathBuf::from(home);
            }
        }
    }
    path.to_path_buf()
}
