use contracts::shared::processor::error_codes;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub component: ComponentConfig,
    /// System settings, looked up as `extrafields.<key>` or `extrafields_<key>`
    #[serde(default)]
    pub options: HashMap<String, String>,
    #[serde(default)]
    pub permissions: PermissionsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Full connection string; takes precedence over `path`
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "target/db/extrafields.db".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Deserialize, Clone)]
pub struct ComponentConfig {
    /// Base directory of the component (lexicon files live under `lexicon/`)
    #[serde(default = "default_component_path")]
    pub path: PathBuf,
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            path: default_component_path(),
            locale: default_locale(),
        }
    }
}

fn default_component_path() -> PathBuf {
    PathBuf::from("components/extrafields")
}

fn default_locale() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PermissionsConfig {
    #[serde(default = "default_granted")]
    pub granted: Vec<String>,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            granted: default_granted(),
        }
    }
}

fn default_granted() -> Vec<String> {
    vec![
        "extrafields.field_save".to_string(),
        "extrafields.field_remove".to_string(),
    ]
}

/// Errors raised before any domain logic runs. Each maps to a stable code.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not locate config.toml. Searched: {searched}")]
    NotFound { searched: String },

    #[error("Could not read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Database initialization failed: {0}")]
    Database(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::NotFound { .. } => error_codes::CONFIG_NOT_FOUND,
            ConfigError::Unreadable { .. } | ConfigError::Invalid { .. } => {
                error_codes::CONFIG_INVALID
            }
            ConfigError::Database(_) => error_codes::DATABASE_INIT_FAILED,
        }
    }
}

impl Config {
    /// Connection string for sea-orm
    pub fn database_url(&self) -> String {
        match &self.database.url {
            Some(url) => url.clone(),
            None => build_sqlite_url(&resolve_relative(Path::new(&self.database.path))),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Parse configuration from TOML text
pub fn parse_config(contents: &str, origin: &Path) -> Result<Config, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Invalid {
        path: origin.display().to_string(),
        source,
    })
}

/// Load configuration from an explicit file
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    tracing::info!("Loading config from: {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&contents, path)
}

/// Candidate locations of config.toml, in search order:
/// 1. Next to the executable (for production)
/// 2. Current directory
/// 3. Workspace root when running from target/
pub fn candidate_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            paths.push(exe_dir.join("config.toml"));
        }
    }

    paths.push(PathBuf::from("config.toml"));
    paths.push(PathBuf::from("../../config.toml"));

    paths
}

/// Find and load config.toml. An explicit path is used as is, without searching.
pub fn discover_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                searched: path.display().to_string(),
            });
        }
        return load_config_from(path);
    }

    let candidates = candidate_config_paths();
    match candidates.iter().find(|p| p.is_file()) {
        Some(path) => load_config_from(path),
        None => {
            let searched = candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!("config.toml not found, searched: {}", searched);
            Err(ConfigError::NotFound { searched })
        }
    }
}

/// Relative paths resolve against the executable directory, falling back to cwd
fn resolve_relative(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    path.to_path_buf()
}

pub fn build_sqlite_url(path: &Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[database]
url = "sqlite::memory:"

[server]
port = 8088

[component]
path = "/srv/extrafields"

[options]
"extrafields.default_rank" = "10"

[permissions]
granted = ["extrafields.field_save"]
"#;

    #[test]
    fn test_sample_config_loads() {
        let config = parse_config(SAMPLE, Path::new("config.toml")).unwrap();
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.component.locale, "en");
        assert_eq!(config.options["extrafields.default_rank"], "10");
        assert_eq!(config.permissions.granted.len(), 1);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("", Path::new("config.toml")).unwrap();
        assert_eq!(config.database.path, "target/db/extrafields.db");
        assert_eq!(config.permissions.granted.len(), 2);
    }

    #[test]
    fn test_invalid_config_has_stable_code() {
        let err = parse_config("[server]\nport = \"x\"", Path::new("config.toml")).unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }

    #[test]
    fn test_missing_explicit_config() {
        let err = discover_config(Some(Path::new("/nonexistent/extrafields.toml"))).unwrap_err();
        assert_eq!(err.code(), "CONFIG_NOT_FOUND");
    }

    #[test]
    fn test_sqlite_url() {
        assert_eq!(
            build_sqlite_url(Path::new("/var/db/app.db")),
            "sqlite:///var/db/app.db?mode=rwc"
        );
        assert_eq!(
            build_sqlite_url(Path::new("C:\\data\\app.db")),
            "sqlite:///C:/data/app.db?mode=rwc"
        );
    }
}
