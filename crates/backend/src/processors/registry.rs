use contracts::shared::processor::ProcessorResponse;
use std::collections::HashMap;

use super::diagnostics::RunDiagnosticsProcessor;
use super::field::{
    CreateFieldProcessor, DeleteFieldProcessor, GetFieldListProcessor, GetFieldProcessor,
    UpdateFieldProcessor,
};
use super::value::{GetResourceValuesProcessor, GetValueProcessor, SetValueProcessor};
use super::{Processor, Properties};
use crate::shared::host::Host;

/// Processors the connector can dispatch to, keyed by action
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: HashMap<&'static str, Box<dyn Processor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every processor of the component
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(CreateFieldProcessor);
        registry.register(UpdateFieldProcessor);
        registry.register(DeleteFieldProcessor);
        registry.register(GetFieldProcessor);
        registry.register(GetFieldListProcessor);
        registry.register(GetValueProcessor);
        registry.register(SetValueProcessor);
        registry.register(GetResourceValuesProcessor);
        registry.register(RunDiagnosticsProcessor);
        registry
    }

    pub fn register<P: Processor + 'static>(&mut self, processor: P) {
        self.processors.insert(processor.action(), Box::new(processor));
    }

    pub fn get(&self, action: &str) -> Option<&dyn Processor> {
        self.processors.get(action).map(|p| p.as_ref())
    }

    pub fn contains(&self, action: &str) -> bool {
        self.processors.contains_key(action)
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn actions(&self) -> Vec<&'static str> {
        let mut actions: Vec<_> = self.processors.keys().copied().collect();
        actions.sort_unstable();
        actions
    }

    /// Run the processor for `action`; `None` when there is no such processor
    pub async fn run(
        &self,
        action: &str,
        host: &dyn Host,
        props: &Properties,
    ) -> Option<ProcessorResponse> {
        let processor = self.get(action)?;
        tracing::debug!("Running processor {}", action);
        Some(processor.process(host, self, props).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_field_crud() {
        let registry = ProcessorRegistry::with_defaults();
        for action in ["mgr/field/create", "mgr/field/update", "mgr/field/delete"] {
            assert!(registry.contains(action), "{} missing", action);
        }
        assert!(registry.contains("mgr/diagnostics/run"));
        assert!(!registry.contains("mgr/field/../../etc"));
        assert_eq!(registry.actions().len(), registry.len());
    }
}
