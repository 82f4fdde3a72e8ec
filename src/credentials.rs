//! Registry credential resolution
//!
//! An automation token is taken from the process environment or the package's
//! local env file. Without one (or when forced) the operator is asked for a
//! one-time code.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::CredentialsConfig;
use crate::domain::{Credential, MIN_ONE_TIME_CODE_LEN};
use crate::error::{ReleaseError, Result};
use crate::ui::Prompter;

pub struct CredentialResolver {
    token_key: String,
    env_file: PathBuf,
}

impl CredentialResolver {
    pub fn new(config: &CredentialsConfig, package_dir: &Path) -> Self {
        CredentialResolver {
            token_key: config.token_key.clone(),
            env_file: package_dir.join(&config.env_file),
        }
    }

    /// Look up the automation token: environment first, then the env file.
    ///
    /// Empty values count as absent. A missing env file is not an error.
    pub fn load_token(&self) -> Result<Option<String>> {
        if let Ok(value) = env::var(&self.token_key) {
            let value = value.trim();
            if !value.is_empty() {
                tracing::debug!(source = "environment", "found automation token");
                return Ok(Some(value.to_string()));
            }
        }

        if !self.env_file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.env_file)?;
        let token = token_from_env_file(&content, &self.token_key)?;
        if token.is_some() {
            tracing::debug!(source = %self.env_file.display(), "found automation token");
        }
        Ok(token)
    }

    /// Pick the credential for this publish attempt
    pub fn resolve(&self, force_interactive: bool, prompter: &mut dyn Prompter) -> Result<Credential> {
        if !force_interactive {
            if let Some(token) = self.load_token()? {
                return Ok(Credential::AutomationToken(token));
            }
        }

        let code = prompter.prompt_text("Enter your npm OTP code:")?;
        let code = code.trim();
        if code.chars().count() < MIN_ONE_TIME_CODE_LEN {
            return Err(ReleaseError::credential(format!(
                "one-time code must be at least {} characters",
                MIN_ONE_TIME_CODE_LEN
            )));
        }
        Ok(Credential::OneTimeCode(code.to_string()))
    }
}

fn token_from_env_file(content: &str, key: &str) -> Result<Option<String>> {
    let pattern = format!(r#"{}\s*=\s*["']?([^"'\n]+)["']?"#, regex::escape(key));
    let re = Regex::new(&pattern).map_err(|e| ReleaseError::config(e.to_string()))?;
    Ok(re
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|token| !token.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{Answer, ScriptedPrompter};
    use serial_test::serial;
    use tempfile::TempDir;

    const KEY: &str = "PKGPUBLISH_TEST_TOKEN";

    fn resolver(dir: &TempDir) -> CredentialResolver {
        let config = CredentialsConfig {
            token_key: KEY.to_string(),
            ..CredentialsConfig::default()
        };
        CredentialResolver::new(&config, dir.path())
    }

    #[test]
    fn test_env_file_parsing() {
        assert_eq!(
            token_from_env_file("NPM_PUBLISH_TOKEN=npm_abc\n", "NPM_PUBLISH_TOKEN").unwrap(),
            Some("npm_abc".to_string())
        );
        assert_eq!(
            token_from_env_file("OTHER=1\nNPM_PUBLISH_TOKEN = \"npm_quoted\"\n", "NPM_PUBLISH_TOKEN")
                .unwrap(),
            Some("npm_quoted".to_string())
        );
        assert_eq!(
            token_from_env_file("NPM_PUBLISH_TOKEN='npm_single'", "NPM_PUBLISH_TOKEN").unwrap(),
            Some("npm_single".to_string())
        );
        assert_eq!(token_from_env_file("NPM_PUBLISH_TOKEN=\n", "NPM_PUBLISH_TOKEN").unwrap(), None);
        assert_eq!(token_from_env_file("", "NPM_PUBLISH_TOKEN").unwrap(), None);
    }

    #[test]
    #[serial]
    fn test_environment_wins_over_env_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), format!("{}=from_file\n", KEY)).unwrap();
        env::set_var(KEY, "from_env");

        let token = resolver(&dir).load_token().unwrap();
        env::remove_var(KEY);
        assert_eq!(token, Some("from_env".to_string()));
    }

    #[test]
    #[serial]
    fn test_empty_environment_falls_back_to_env_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), format!("{}=from_file\n", KEY)).unwrap();
        env::set_var(KEY, "  ");

        let token = resolver(&dir).load_token().unwrap();
        env::remove_var(KEY);
        assert_eq!(token, Some("from_file".to_string()));
    }

    #[test]
    #[serial]
    fn test_token_resolves_without_prompting() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), format!("{}=npm_tok\n", KEY)).unwrap();
        env::remove_var(KEY);

        let mut prompter = ScriptedPrompter::new([]);
        let credential = resolver(&dir).resolve(false, &mut prompter).unwrap();
        assert_eq!(credential, Credential::AutomationToken("npm_tok".to_string()));
        assert!(prompter.asked().is_empty());
    }

    #[test]
    #[serial]
    fn test_forced_interactive_prompts_even_with_token() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), format!("{}=npm_tok\n", KEY)).unwrap();
        env::remove_var(KEY);

        let mut prompter = ScriptedPrompter::new([Answer::Text(" 123456 ".to_string())]);
        let credential = resolver(&dir).resolve(true, &mut prompter).unwrap();
        assert_eq!(credential, Credential::OneTimeCode("123456".to_string()));
        assert_eq!(prompter.asked(), ["Enter your npm OTP code:"]);
    }

    #[test]
    #[serial]
    fn test_short_code_is_invalid_credential() {
        let dir = TempDir::new().unwrap();
        env::remove_var(KEY);

        let mut prompter = ScriptedPrompter::new([Answer::Text("12345".to_string())]);
        let err = resolver(&dir).resolve(false, &mut prompter).unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidCredential(_)));
    }
}
