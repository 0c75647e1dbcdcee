//! Bearer token pool configuration

use crate::domains::utils::{read_string_entries, resolve_relative};
use crate::error::ConfigResult;
use crate::validation::{validate_enum_choice, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pool of credentials a request may be authenticated with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Inline tokens
    #[serde(default)]
    pub tokens: Vec<String>,

    /// JSON file with more tokens, `[{"token": "..."}]` or `["..."]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_file: Option<PathBuf>,

    /// Authorization scheme prefix
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            tokens_file: None,
            scheme: default_scheme(),
        }
    }
}

impl CredentialsConfig {
    /// Append the contents of `tokens_file` to the inline pool.
    pub fn load_files(&mut self, base_dir: Option<&Path>) -> ConfigResult<()> {
        if let Some(ref file) = self.tokens_file {
            let path = resolve_relative(file, base_dir);
            let tokens = read_string_entries(&path, "token")?;
            log::debug!("Loaded {} tokens from {:?}", tokens.len(), path);
            self.tokens.extend(tokens);
        }
        Ok(())
    }
}

impl Validatable for CredentialsConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_enum_choice(&self.scheme, &["bearer", "token"], "scheme", self.domain_name())?;

        for token in &self.tokens {
            validate_required_string(token, "tokens[]", self.domain_name())?;
        }

        if self.tokens.is_empty() {
            log::warn!("Credential pool is empty; requests will be sent without Authorization");
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "credentials"
    }
}

fn default_scheme() -> String {
    "bearer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_credentials_defaults() {
        let config = CredentialsConfig::default();
        assert!(config.tokens.is_empty());
        assert_eq!(config.scheme, "bearer");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_token_rejected() {
        let config = CredentialsConfig {
            tokens: vec!["abc".to_string(), " ".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_token_file_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("tokens.json")).unwrap();
        write!(file, r#"[{{"token": "t-1"}}, {{"token": "t-2"}}]"#).unwrap();

        let mut config = CredentialsConfig {
            tokens: vec!["inline".to_string()],
            tokens_file: Some(PathBuf::from("tokens.json")),
            ..Default::default()
        };
        config.load_files(Some(dir.path())).unwrap();

        assert_eq!(config.tokens, vec!["inline", "t-1", "t-2"]);
    }
}
