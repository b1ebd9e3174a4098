use async_trait::async_trait;
use contracts::shared::processor::ProcessorResponse;

use super::registry::ProcessorRegistry;
use super::{Processor, Properties};
use crate::diagnostics::Diagnostics;
use crate::shared::error::ProcessorError;
use crate::shared::host::Host;

pub struct RunDiagnosticsProcessor;

#[async_trait]
impl Processor for RunDiagnosticsProcessor {
    fn action(&self) -> &'static str {
        "mgr/diagnostics/run"
    }

    async fn run(
        &self,
        host: &dyn Host,
        registry: &ProcessorRegistry,
        _props: &Properties,
    ) -> Result<ProcessorResponse, ProcessorError> {
        // the registry that dispatched this request, not a fresh one
        let report = Diagnostics::new(host, registry).run().await;

        let key = if report.ok {
            "extrafields.diagnostics_passed"
        } else {
            "extrafields.diagnostics_failed"
        };

        Ok(ProcessorResponse {
            success: report.ok,
            message: host.lexicon(key, &[]),
            object: Some(serde_json::to_value(&report)?),
            ..Default::default()
        })
    }
}
