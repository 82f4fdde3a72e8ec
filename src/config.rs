use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::TagPattern;
use crate::error::{ReleaseError, Result};

const LOCAL_CONFIG: &str = "./pkgpublish.toml";
const USER_CONFIG: &str = ".pkgpublish.toml";

/// Represents the complete configuration for pkg-publish.
///
/// Every section is optional in the file; missing keys fall back to the defaults below.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub preflight: PreflightConfig,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub classification: ClassificationConfig,
}

/// Where the package lives and which manifest records its version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PackageConfig {
    #[serde(default = "default_package_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_manifest")]
    pub manifest: String,
}

fn default_package_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_manifest() -> String {
    "package.json".to_string()
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            dir: default_package_dir(),
            manifest: default_manifest(),
        }
    }
}

impl PackageConfig {
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(&self.manifest)
    }
}

/// Registry client settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_url")]
    pub url: String,

    /// Registry CLI binary
    #[serde(default = "default_client")]
    pub client: String,

    #[serde(default = "default_access")]
    pub access: Option<String>,

    /// Propagation delay before the post-publish check
    #[serde(default = "default_verify_delay_secs")]
    pub verify_delay_secs: u64,
}

fn default_registry_url() -> String {
    "https://registry.npmjs.org".to_string()
}

fn default_client() -> String {
    "npm".to_string()
}

fn default_access() -> Option<String> {
    Some("public".to_string())
}

fn default_verify_delay_secs() -> u64 {
    2
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            url: default_registry_url(),
            client: default_client(),
            access: default_access(),
            verify_delay_secs: default_verify_delay_secs(),
        }
    }
}

impl RegistryConfig {
    pub fn verify_delay(&self) -> Duration {
        Duration::from_secs(self.verify_delay_secs)
    }

    /// Registry host as used in auth-file keys ("registry.npmjs.org/")
    pub fn auth_key(&self) -> String {
        let without_scheme = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        format!("{}/", without_scheme.trim_end_matches('/'))
    }
}

/// Where automation tokens are read from and where the scoped auth file is written.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CredentialsConfig {
    /// Local secret file, relative to the package directory
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,

    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Package-local auth file written for the duration of a token publish
    #[serde(default = "default_auth_file")]
    pub auth_file: String,
}

fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}

fn default_token_key() -> String {
    "NPM_PUBLISH_TOKEN".to_string()
}

fn default_auth_file() -> String {
    ".npmrc".to_string()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        CredentialsConfig {
            env_file: default_env_file(),
            token_key: default_token_key(),
            auth_file: default_auth_file(),
        }
    }
}

/// Test and build gating.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PreflightConfig {
    /// Overrides lockfile detection when set (npm, pnpm, yarn, bun)
    #[serde(default)]
    pub package_manager: Option<String>,

    #[serde(default = "default_test_script")]
    pub test_script: String,

    #[serde(default = "default_build_script")]
    pub build_script: String,
}

fn default_test_script() -> String {
    "test:unit".to_string()
}

fn default_build_script() -> String {
    "build".to_string()
}

impl Default for PreflightConfig {
    fn default() -> Self {
        PreflightConfig {
            package_manager: None,
            test_script: default_test_script(),
            build_script: default_build_script(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    #[serde(default = "default_tag_pattern")]
    pub pattern: String,

    /// Remote named in the manual push instruction
    #[serde(default = "default_remote")]
    pub remote: String,
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            pattern: default_tag_pattern(),
            remote: default_remote(),
        }
    }
}

impl TagsConfig {
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(&self.pattern)
    }
}

/// Keywords used to classify commit summaries.
///
/// Matching is substring-based over lowercased summaries; major keywords win over minor.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ClassificationConfig {
    #[serde(default = "default_major_keywords")]
    pub major_keywords: Vec<String>,

    #[serde(default = "default_minor_keywords")]
    pub minor_keywords: Vec<String>,
}

fn default_major_keywords() -> Vec<String> {
    vec!["breaking".to_string(), "!:".to_string(), "major".to_string()]
}

fn default_minor_keywords() -> Vec<String> {
    vec![
        "feat".to_string(),
        "feature".to_string(),
        "add".to_string(),
        "new".to_string(),
    ]
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        ClassificationConfig {
            major_keywords: default_major_keywords(),
            minor_keywords: default_minor_keywords(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `pkgpublish.toml` in current directory
/// 3. `.pkgpublish.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or its tag pattern is invalid
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        Some(PathBuf::from(path))
    } else if Path::new(LOCAL_CONFIG).exists() {
        Some(PathBuf::from(LOCAL_CONFIG))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(USER_CONFIG))
            .filter(|p| p.exists())
    };

    let Some(path) = path else {
        tracing::debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config = parse_config(&config_str)
        .map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Parse and validate a configuration document
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(config_str).map_err(|e| ReleaseError::config(e.to_string()))?;
    config.tags.tag_pattern()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_key_strips_scheme() {
        let registry = RegistryConfig::default();
        assert_eq!(registry.auth_key(), "registry.npmjs.org/");

        let custom = RegistryConfig {
            url: "http://localhost:4873/".to_string(),
            ..RegistryConfig::default()
        };
        assert_eq!(custom.auth_key(), "localhost:4873/");
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = parse_config(
            r#"
[registry]
verify_delay_secs = 0

[classification]
minor_keywords = ["feat"]
"#,
        )
        .unwrap();
        assert_eq!(config.registry.verify_delay(), Duration::ZERO);
        assert_eq!(config.registry.client, "npm");
        assert_eq!(config.classification.minor_keywords, vec!["feat"]);
        assert!(config
            .classification
            .major_keywords
            .contains(&"!:".to_string()));
    }

    #[test]
    fn test_invalid_tag_pattern_rejected() {
        let err = parse_config("[tags]\npattern = \"release\"\n").unwrap_err();
        assert!(err.to_string().contains("{version}"));
    }

    #[test]
    fn test_manifest_path_joins_dir() {
        let package = PackageConfig {
            dir: PathBuf::from("cli"),
            manifest: "package.json".to_string(),
        };
        assert_eq!(package.manifest_path(), PathBuf::from("cli/package.json"));
    }
}
