//! Application configuration for docsteps.
//!
//! User config lives at `~/.docsteps/docsteps.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocStepsError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docsteps.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docsteps";

// ---------------------------------------------------------------------------
// Config structs (matching docsteps.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where tutorial content lives and how it is laid out.
    #[serde(default)]
    pub content: ContentConfig,

    /// Site routes the tutorials are mounted under.
    #[serde(default)]
    pub routes: RoutesConfig,
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Directory holding one sub-directory per tutorial.
    #[serde(default = "default_root")]
    pub root: String,

    /// Name of the per-tutorial metadata document.
    #[serde(default = "default_meta_file")]
    pub meta_file: String,

    /// File stem of a tutorial's home document.
    #[serde(default = "default_index_stem")]
    pub index_stem: String,

    /// File extensions treated as step documents.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            meta_file: default_meta_file(),
            index_stem: default_index_stem(),
            extensions: default_extensions(),
        }
    }
}

fn default_root() -> String {
    "tutorials".into()
}
fn default_meta_file() -> String {
    "meta.json".into()
}
fn default_index_stem() -> String {
    "index".into()
}
fn default_extensions() -> Vec<String> {
    vec!["md".into(), "mdx".into()]
}

/// `[routes]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Route every tutorial is mounted under.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Route of the regular documentation pages.
    #[serde(default = "default_docs_prefix")]
    pub docs_prefix: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            docs_prefix: default_docs_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "/tutorials".into()
}
fn default_docs_prefix() -> String {
    "/docs".into()
}

// ---------------------------------------------------------------------------
// Route config (runtime, derived from config)
// ---------------------------------------------------------------------------

/// Runtime routing rules shared by the resolver and navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    /// Tutorial mount point, without trailing slash (e.g. `/tutorials`).
    pub prefix: String,
    /// Docs mount point, without trailing slash.
    pub docs_prefix: String,
    /// Home document stem (e.g. `index`).
    pub index_stem: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for RouteConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            prefix: normalize_prefix(&config.routes.prefix),
            docs_prefix: normalize_prefix(&config.routes.docs_prefix),
            index_stem: config.content.index_stem.clone(),
        }
    }
}

impl RouteConfig {
    /// Root route of one tutorial, e.g. `/tutorials/intro`.
    pub fn tutorial_root(&self, id: &str) -> String {
        format!("{}/{id}", self.prefix)
    }
}

/// Ensure a leading slash and strip trailing ones.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docsteps/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocStepsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docsteps/docsteps.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocStepsError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        DocStepsError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    if config.content.extensions.is_empty() {
        return Err(DocStepsError::config(
            "content.extensions must list at least one step document extension",
        ));
    }

    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocStepsError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocStepsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocStepsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("meta_file"));
        assert!(toml_str.contains("/tutorials"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.content.root, "tutorials");
        assert_eq!(parsed.content.extensions, vec!["md", "mdx"]);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[routes]
prefix = "learn/"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.content.meta_file, "meta.json");

        let routes = RouteConfig::from(&config);
        assert_eq!(routes.prefix, "/learn");
        assert_eq!(routes.docs_prefix, "/docs");
        assert_eq!(routes.tutorial_root("intro"), "/learn/intro");
    }

    #[test]
    fn load_config_rejects_empty_extensions() {
        let dir = std::env::temp_dir().join(format!("docsteps-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[content]\nextensions = []\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("extensions"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_config_reports_parse_errors() {
        let dir = std::env::temp_dir().join(format!("docsteps-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[content\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().starts_with("config error: failed to parse"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
