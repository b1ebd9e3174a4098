//! Persisted server log. Entries written here are what failure messages
//! mean by "check the error log".

pub mod repository;

use contracts::shared::logger::LogLevel;
use sea_orm::ConnectionTrait;

/// Only warnings and errors are persisted; everything goes to tracing.
pub fn is_persisted(level: LogLevel) -> bool {
    matches!(level, LogLevel::Error | LogLevel::Warn)
}

/// Emit a tracing event and, for warnings and errors, store it.
/// A failure to store is reported on stderr and otherwise ignored.
pub async fn log<C: ConnectionTrait>(db: &C, level: LogLevel, message: &str, context: &str) {
    match level {
        LogLevel::Error => tracing::error!(context = context, "{}", message),
        LogLevel::Warn => tracing::warn!(context = context, "{}", message),
        LogLevel::Info => tracing::info!(context = context, "{}", message),
        LogLevel::Debug => tracing::debug!(context = context, "{}", message),
    }

    if !is_persisted(level) {
        return;
    }

    if let Err(e) = repository::log_event(db, level, context, message).await {
        eprintln!("Failed to log event: {}", e);
    }
}
