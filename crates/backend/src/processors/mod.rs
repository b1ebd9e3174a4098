//! Action-keyed request processors (`mgr/field/update`, ...).
//!
//! A processor body returns `Result<ProcessorResponse, ProcessorError>`;
//! [`Processor::process`] is the boundary that turns errors into failure
//! envelopes and logs them. Nothing propagates past it. Each call also sees
//! the registry that dispatched it.

pub mod diagnostics;
pub mod field;
pub mod props;
pub mod registry;
pub mod value;

use async_trait::async_trait;
use contracts::shared::logger::LogLevel;
use contracts::shared::processor::ProcessorResponse;

use crate::shared::error::ProcessorError;
use crate::shared::host::Host;

pub use props::Properties;
pub use registry::ProcessorRegistry;

#[async_trait]
pub trait Processor: Send + Sync {
    fn action(&self) -> &'static str;

    /// Lexicon key of the generic failure message
    fn failure_key(&self) -> &'static str {
        "extrafields.err_unexpected"
    }

    /// Lexicon key used when the target object does not exist
    fn not_found_key(&self) -> &'static str {
        "extrafields.field_err_nf"
    }

    async fn run(
        &self,
        host: &dyn Host,
        registry: &ProcessorRegistry,
        props: &Properties,
    ) -> Result<ProcessorResponse, ProcessorError>;

    async fn process(
        &self,
        host: &dyn Host,
        registry: &ProcessorRegistry,
        props: &Properties,
    ) -> ProcessorResponse {
        match self.run(host, registry, props).await {
            Ok(response) => response,
            Err(err) => failure_response(host, self, err).await,
        }
    }
}

/// Convert an error into a failure envelope, logging what the caller does not see
pub async fn failure_response<P: Processor + ?Sized>(
    host: &dyn Host,
    processor: &P,
    err: ProcessorError,
) -> ProcessorResponse {
    let action = processor.action();
    let failure = host.lexicon(processor.failure_key(), &[]);

    match err {
        ProcessorError::Validation(errors) => {
            tracing::debug!("{}: validation failed: {:?}", action, errors);
            ProcessorResponse::failure(failure, errors)
        }
        ProcessorError::NotFound => {
            ProcessorResponse::failure(host.lexicon(processor.not_found_key(), &[]), vec![])
        }
        ProcessorError::PermissionDenied(permission) => {
            host.log(
                LogLevel::Warn,
                &format!("Permission {} denied", permission),
                action,
            )
            .await;
            ProcessorResponse::failure(host.lexicon("access_denied", &[]), vec![])
        }
        ProcessorError::Persistence { detail } => {
            let detail = detail.unwrap_or_else(|| {
                "No specific error details available; check the server log.".to_string()
            });
            ProcessorResponse::failure(format!("{} {}", failure, detail), vec![])
        }
        ProcessorError::Storage { code, message } => {
            host.log(
                LogLevel::Error,
                &format!("Storage error in {}: {} | Code: {}", action, message, code),
                action,
            )
            .await;
            ProcessorResponse::failure(
                format!("{} SQL Error ({}): {}", failure, code, message),
                vec![],
            )
        }
        ProcessorError::Unexpected { message, location } => {
            host.log(
                LogLevel::Error,
                &format!("Unexpected error in {}: {} | At: {}", action, message, location),
                action,
            )
            .await;
            ProcessorResponse::failure(format!("{} Exception: {}", failure, message), vec![])
        }
    }
}
