//! Application configuration
//!
//! Loaded from YAML with every section optional, then overridden from
//! `MESA_*` environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

use mesa_core::constants::{DEFAULT_FAVORITES_KEY, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_RADIUS_M};
use mesa_firebase::FirebaseConfig;

use crate::logging::DEFAULT_LOG_FILTER;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MesaConfig {
    pub places: PlacesConfig,
    pub storage: StorageConfig,
    pub search: SearchConfig,
    pub firebase: FirebaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub api_key: String,
    pub language: String,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: "es".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory of the file-backed device store
    pub dir: PathBuf,
    pub favorites_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            favorites_key: DEFAULT_FAVORITES_KEY.to_string(),
        }
    }
}

fn default_storage_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".config").join("mesa"),
        None => PathBuf::from(".mesa"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub page_size: usize,
    pub default_radius_m: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_radius_m: DEFAULT_SEARCH_RADIUS_M,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directives used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn parse_override<T: FromStr>(name: &str, raw: &str, target: &mut T) {
    match raw.trim().parse::<T>() {
        Ok(value) => *target = value,
        Err(_) => warn!("[MesaConfig] Ignoring invalid {}={:?}", name, raw),
    }
}

impl MesaConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Failed to parse Mesa configuration YAML")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// File (when given) plus environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |name: &str, target: &mut String| {
            if let Some(value) = lookup(name) {
                *target = value;
            }
        };
        set("MESA_PLACES_API_KEY", &mut self.places.api_key);
        set("MESA_PLACES_LANGUAGE", &mut self.places.language);
        set("MESA_FAVORITES_KEY", &mut self.storage.favorites_key);
        set("MESA_FIREBASE_API_KEY", &mut self.firebase.api_key);
        set("MESA_FIREBASE_AUTH_DOMAIN", &mut self.firebase.auth_domain);
        set("MESA_FIREBASE_PROJECT_ID", &mut self.firebase.project_id);
        set("MESA_FIREBASE_STORAGE_BUCKET", &mut self.firebase.storage_bucket);
        set(
            "MESA_FIREBASE_MESSAGING_SENDER_ID",
            &mut self.firebase.messaging_sender_id,
        );
        set("MESA_FIREBASE_APP_ID", &mut self.firebase.app_id);

        if let Some(dir) = lookup("MESA_STORAGE_DIR") {
            self.storage.dir = PathBuf::from(dir);
        }
        if let Some(token) = lookup("MESA_FIREBASE_ID_TOKEN") {
            self.firebase.id_token = Some(token).filter(|t| !t.trim().is_empty());
        }
        if let Some(raw) = lookup("MESA_PAGE_SIZE") {
            parse_override("MESA_PAGE_SIZE", &raw, &mut self.search.page_size);
        }
        if let Some(raw) = lookup("MESA_SEARCH_RADIUS") {
            parse_override("MESA_SEARCH_RADIUS", &raw, &mut self.search.default_radius_m);
        }
    }
}
