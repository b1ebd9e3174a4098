use async_trait::async_trait;
use contracts::domain::a001_field::aggregate::FieldId;
use contracts::shared::logger::LogLevel;
use contracts::shared::processor::ProcessorResponse;
use serde_json::json;

use super::props::{self, Properties};
use super::{Processor, ProcessorRegistry};
use crate::domain::a002_field_value::service;
use crate::shared::error::ProcessorError;
use crate::shared::host::Host;

fn target(props: &Properties) -> Result<(FieldId, i32), ProcessorError> {
    let field_id = props::require_i32(props, "field_id")?;
    let resource_id = props::require_i32(props, "resource_id")?;
    Ok((FieldId(field_id), resource_id))
}

pub struct GetValueProcessor;

#[async_trait]
impl Processor for GetValueProcessor {
    fn action(&self) -> &'static str {
        "mgr/value/get"
    }

    async fn run(
        &self,
        host: &dyn Host,
        _registry: &ProcessorRegistry,
        props: &Properties,
    ) -> Result<ProcessorResponse, ProcessorError> {
        let (field_id, resource_id) = target(props)?;
        let value = service::get_value(host, field_id, resource_id).await?;
        Ok(ProcessorResponse::success(
            "",
            Some(json!({
                "field_id": field_id,
                "resource_id": resource_id,
                "value": value,
            })),
        ))
    }
}

pub struct SetValueProcessor;

#[async_trait]
impl Processor for SetValueProcessor {
    fn action(&self) -> &'static str {
        "mgr/value/set"
    }

    fn failure_key(&self) -> &'static str {
        "extrafields.value_err_save"
    }

    async fn run(
        &self,
        host: &dyn Host,
        _registry: &ProcessorRegistry,
        props: &Properties,
    ) -> Result<ProcessorResponse, ProcessorError> {
        let (field_id, resource_id) = target(props)?;
        let value = props::get_string(props, "value").unwrap_or_default();

        if !service::set_value(host, field_id, resource_id, &value).await? {
            let detail = format!(
                "No rows written for field {} / resource {}",
                field_id, resource_id
            );
            host.log(LogLevel::Error, &detail, self.action()).await;
            return Err(ProcessorError::Persistence {
                detail: Some(detail),
            });
        }

        Ok(ProcessorResponse::success(
            "",
            Some(json!({
                "field_id": field_id,
                "resource_id": resource_id,
                "value": value,
            })),
        ))
    }
}

pub struct GetResourceValuesProcessor;

#[async_trait]
impl Processor for GetResourceValuesProcessor {
    fn action(&self) -> &'static str {
        "mgr/value/getlist"
    }

    async fn run(
        &self,
        host: &dyn Host,
        _registry: &ProcessorRegistry,
        props: &Properties,
    ) -> Result<ProcessorResponse, ProcessorError> {
        let resource_id = props::require_i32(props, "resource_id")?;
        let items = service::list_for_resource(host, resource_id).await?;
        Ok(ProcessorResponse::list(
            items.len() as u64,
            serde_json::to_value(&items)?,
        ))
    }
}
