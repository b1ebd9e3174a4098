//! Localized messages, keyed like `extrafields.field_err_nf`.
//!
//! Built-in English entries are always present; a `lexicon/<locale>.toml` file
//! in the component directory overrides or extends them.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

static DEFAULT_ENTRIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("access_denied", "Access denied."),
        ("extrafields.field_err_nf", "Field not found."),
        ("extrafields.field_err_ns_name", "Please enter a name for this field."),
        ("extrafields.field_err_ae", "A field already exists with the name \"{name}\"."),
        ("extrafields.field_err_save", "An error occurred while saving the field."),
        ("extrafields.field_err_remove", "An error occurred while removing the field."),
        ("extrafields.value_err_save", "An error occurred while saving the value."),
        ("extrafields.err_unexpected", "An unexpected error occurred."),
        ("extrafields.diagnostics_passed", "Diagnostics passed."),
        ("extrafields.diagnostics_failed", "Diagnostics reported failures."),
    ])
});

#[derive(Debug, Clone)]
pub struct Lexicon {
    locale: String,
    entries: HashMap<String, String>,
    /// File the overrides were read from, if any
    source: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("Could not read lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid lexicon {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin("en")
    }
}

impl Lexicon {
    pub fn builtin(locale: &str) -> Self {
        let entries = DEFAULT_ENTRIES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            locale: locale.to_string(),
            entries,
            source: None,
        }
    }

    /// Path of the topic file for a locale inside the component directory
    pub fn topic_path(component_dir: &Path, locale: &str) -> PathBuf {
        component_dir.join("lexicon").join(format!("{}.toml", locale))
    }

    /// Load built-ins plus overrides from the component directory. A missing topic
    /// file is not an error; a malformed one is.
    pub fn load(component_dir: &Path, locale: &str) -> Result<Self, LexiconError> {
        let mut lexicon = Self::builtin(locale);
        let path = Self::topic_path(component_dir, locale);
        if !path.is_file() {
            return Ok(lexicon);
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let overrides: HashMap<String, String> =
            toml::from_str(&contents).map_err(|source| LexiconError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        lexicon.entries.extend(overrides);
        lexicon.source = Some(path);
        Ok(lexicon)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Message for `key` with `{param}` placeholders substituted.
    /// Unknown keys come back as the key itself.
    pub fn get(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = self
            .entries
            .get(key)
            .map(String::as_str)
            .unwrap_or(key);
        params
            .iter()
            .fold(template.to_string(), |acc, (name, value)| {
                acc.replace(&format!("{{{}}}", name), value)
            })
    }
}
