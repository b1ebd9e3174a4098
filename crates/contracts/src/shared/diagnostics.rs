use serde::{Deserialize, Serialize};

/// Result of a diagnostics run: one log line per check performed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub ok: bool,
    pub log: Vec<String>,
}

impl DiagnosticsReport {
    pub fn status(&self) -> &'static str {
        if self.ok {
            "PASSED"
        } else {
            "FAILED"
        }
    }

    /// Lines of failed checks only
    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.log
            .iter()
            .filter(|line| line.contains('❌'))
            .map(String::as_str)
    }
}
