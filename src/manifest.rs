//! Package manifest (package.json) handling
//!
//! Only `name` and `version` are interpreted; every other key is carried
//! through untouched and in its original order.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::Version;
use crate::error::{ReleaseError, Result};

#[derive(Debug, Clone)]
pub struct PackageManifest {
    path: PathBuf,
    document: serde_json::Map<String, Value>,
}

impl PackageManifest {
    /// Load a manifest from path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ReleaseError::manifest(format!("cannot read {}: {}", path.display(), e))
        })?;

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(document) => Ok(PackageManifest {
                path: path.to_path_buf(),
                document,
            }),
            _ => Err(ReleaseError::manifest(format!(
                "{} is not a JSON object",
                path.display()
            ))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> Result<&str> {
        self.string_field("name")
    }

    /// The recorded working version; malformed versions are a fatal parse error
    pub fn version(&self) -> Result<Version> {
        Version::parse(self.string_field("version")?)
    }

    pub fn set_version(&mut self, version: &Version) {
        self.document
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Write back with 2-space indentation and a trailing newline
    pub fn save(&self) -> Result<()> {
        let mut content = serde_json::to_string_pretty(&self.document)?;
        content.push('\n');
        fs::write(&self.path, content).map_err(|e| {
            ReleaseError::manifest(format!("cannot write {}: {}", self.path.display(), e))
        })
    }

    fn string_field(&self, key: &str) -> Result<&str> {
        self.document
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ReleaseError::manifest(format!(
                    "{} has no '{}' string field",
                    self.path.display(),
                    key
                ))
            })
    }
}
