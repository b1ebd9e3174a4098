//! The narrow surface processors and diagnostics see of their environment:
//! settings, messages, logging, permissions and the database.

use async_trait::async_trait;
use contracts::domain::common::aggregate_root::NAMESPACE;
use contracts::shared::logger::LogLevel;
use sea_orm::DatabaseConnection;
use std::path::Path;
use std::sync::Arc;

use crate::shared::config::Config;
use crate::shared::lexicon::Lexicon;
use crate::shared::logger;

#[async_trait]
pub trait Host: Send + Sync {
    /// Raw option value, without namespacing
    fn raw_option(&self, key: &str) -> Option<String>;

    /// Localized message with `{param}` substitution
    fn lexicon(&self, key: &str, params: &[(&str, &str)]) -> String;

    fn has_permission(&self, permission: &str) -> bool;

    /// Base directory of the component
    fn component_path(&self) -> &Path;

    /// Locale of the loaded lexicon topic
    fn locale(&self) -> &str;

    fn db(&self) -> &DatabaseConnection;

    async fn log(&self, level: LogLevel, message: &str, context: &str);

    /// Component option: `extrafields.<key>` first, `extrafields_<key>` overrides it
    fn option(&self, key: &str, default: &str) -> String {
        let dotted = self.raw_option(&format!("{}.{}", NAMESPACE, key));
        let underscored = self.raw_option(&format!("{}_{}", NAMESPACE, key));
        underscored
            .or(dotted)
            .unwrap_or_else(|| default.to_string())
    }

    fn option_i32(&self, key: &str, default: i32) -> i32 {
        self.option(key, &default.to_string())
            .trim()
            .parse()
            .unwrap_or(default)
    }
}

/// Process-wide context: configuration, lexicon and the connection pool
pub struct AppContext {
    config: Config,
    lexicon: Lexicon,
    db: DatabaseConnection,
}

pub type SharedContext = Arc<AppContext>;

impl AppContext {
    pub fn new(config: Config, lexicon: Lexicon, db: DatabaseConnection) -> Self {
        Self {
            config,
            lexicon,
            db,
        }
    }

    /// Lexicon from the component directory; a broken topic file falls back to built-ins
    pub fn from_config(config: Config, db: DatabaseConnection) -> Self {
        let lexicon = match Lexicon::load(&config.component.path, &config.component.locale) {
            Ok(lexicon) => lexicon,
            Err(e) => {
                tracing::warn!("{}; using built-in messages", e);
                Lexicon::builtin(&config.component.locale)
            }
        };
        Self::new(config, lexicon, db)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[async_trait]
impl Host for AppContext {
    fn raw_option(&self, key: &str) -> Option<String> {
        self.config.options.get(key).cloned()
    }

    fn lexicon(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.lexicon.get(key, params)
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.config
            .permissions
            .granted
            .iter()
            .any(|p| p == permission)
    }

    fn component_path(&self) -> &Path {
        &self.config.component.path
    }

    fn locale(&self) -> &str {
        self.lexicon.locale()
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn log(&self, level: LogLevel, message: &str, context: &str) {
        logger::log(&self.db, level, message, context).await;
    }
}
