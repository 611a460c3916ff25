//! Runtime configuration for cardsmith.
//!
//! Layered: `cardsmith.toml` (when present) → `CARDSMITH_*` environment
//! variables → CLI flags. Every knob has a default, so running with no
//! config file at all works.
//!
//! ```toml
//! [server]
//! port = 5000
//! db_path = ".cardsmith/cards.db"
//! dev = false
//!
//! [schema]
//! base_url = "http://localhost:3000/api-root/krisiyukta-dev"
//! slug = "onboard"
//!
//! [store]
//! base_url = "http://localhost:5000"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "cardsmith.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub schema: SchemaSection,
    pub store: StoreSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub port: u16,
    pub db_path: PathBuf,
    pub dev: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: 5000,
            db_path: PathBuf::from(".cardsmith/cards.db"),
            dev: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchemaSection {
    pub base_url: String,
    pub slug: String,
}

impl Default for SchemaSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api-root/krisiyukta-dev".to_string(),
            slug: "onboard".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub base_url: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration: explicit path, else `cardsmith.toml` in the
    /// working directory, else defaults. Environment overrides apply last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config.apply_env())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn apply_env(mut self) -> Self {
        if let Ok(port) = std::env::var("CARDSMITH_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(db_path) = std::env::var("CARDSMITH_DB_PATH") {
            self.server.db_path = PathBuf::from(db_path);
        }
        if let Ok(base_url) = std::env::var("CARDSMITH_SCHEMA_URL") {
            self.schema.base_url = base_url;
        }
        if let Ok(slug) = std::env::var("CARDSMITH_FORM_SLUG") {
            self.schema.slug = slug;
        }
        if let Ok(base_url) = std::env::var("CARDSMITH_STORE_URL") {
            self.store.base_url = base_url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.db_path, PathBuf::from(".cardsmith/cards.db"));
        assert!(!config.server.dev);
        assert_eq!(config.schema.slug, "onboard");
        assert_eq!(config.store.base_url, "http://localhost:5000");
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cardsmith.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8080\n\n[schema]\nslug = \"billing\"\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.schema.slug, "billing");
        // Untouched keys keep their defaults.
        assert_eq!(config.store.base_url, "http://localhost:5000");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cardsmith.toml");
        std::fs::write(&path, "[server\nport = oops").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
    }
}
