use async_trait::async_trait;
use contracts::domain::a001_field::aggregate::{FieldDto, FieldId, FieldListQuery};
use contracts::shared::processor::ProcessorResponse;

use super::props::{self, Properties};
use super::{Processor, ProcessorRegistry};
use crate::domain::a001_field::service;
use crate::shared::error::ProcessorError;
use crate::shared::host::Host;

fn field_dto(props: &Properties) -> Result<FieldDto, ProcessorError> {
    Ok(FieldDto {
        id: props::get_i32(props, "id")?,
        name: props::get_string(props, "name").unwrap_or_default(),
        description: props::get_string(props, "description"),
        rank: props::get_i32(props, "rank")?,
    })
}

/// The `id` property resolved to an identifier; a missing or malformed id
/// cannot resolve to an object.
fn object_id(props: &Properties) -> Result<FieldId, ProcessorError> {
    match props::get_i32(props, "id") {
        Ok(Some(id)) => Ok(FieldId(id)),
        _ => Err(ProcessorError::NotFound),
    }
}

pub struct CreateFieldProcessor;

#[async_trait]
impl Processor for CreateFieldProcessor {
    fn action(&self) -> &'static str {
        "mgr/field/create"
    }

    fn failure_key(&self) -> &'static str {
        "extrafields.field_err_save"
    }

    async fn run(
        &self,
        host: &dyn Host,
        _registry: &ProcessorRegistry,
        props: &Properties,
    ) -> Result<ProcessorResponse, ProcessorError> {
        let dto = field_dto(props)?;
        let field = service::create(host, &dto).await?;
        Ok(ProcessorResponse::success("", Some(serde_json::to_value(&field)?)))
    }
}

pub struct UpdateFieldProcessor;

#[async_trait]
impl Processor for UpdateFieldProcessor {
    fn action(&self) -> &'static str {
        "mgr/field/update"
    }

    fn failure_key(&self) -> &'static str {
        "extrafields.field_err_save"
    }

    async fn run(
        &self,
        host: &dyn Host,
        _registry: &ProcessorRegistry,
        props: &Properties,
    ) -> Result<ProcessorResponse, ProcessorError> {
        let id = object_id(props)?;
        let dto = field_dto(props)?;
        let field = service::update(host, id, &dto).await?;
        Ok(ProcessorResponse::success("", Some(serde_json::to_value(&field)?)))
    }
}

pub struct DeleteFieldProcessor;

#[async_trait]
impl Processor for DeleteFieldProcessor {
    fn action(&self) -> &'static str {
        "mgr/field/delete"
    }

    fn failure_key(&self) -> &'static str {
        "extrafields.field_err_remove"
    }

    async fn run(
        &self,
        host: &dyn Host,
        _registry: &ProcessorRegistry,
        props: &Properties,
    ) -> Result<ProcessorResponse, ProcessorError> {
        let id = object_id(props)?;
        let field = service::delete(host, id).await?;
        Ok(ProcessorResponse::success("", Some(serde_json::to_value(&field)?)))
    }
}

pub struct GetFieldProcessor;

#[async_trait]
impl Processor for GetFieldProcessor {
    fn action(&self) -> &'static str {
        "mgr/field/get"
    }

    async fn run(
        &self,
        host: &dyn Host,
        _registry: &ProcessorRegistry,
        props: &Properties,
    ) -> Result<ProcessorResponse, ProcessorError> {
        let id = object_id(props)?;
        let field = service::get_by_id(host, id)
            .await?
            .ok_or(ProcessorError::NotFound)?;
        Ok(ProcessorResponse::success("", Some(serde_json::to_value(&field)?)))
    }
}

pub struct GetFieldListProcessor;

#[async_trait]
impl Processor for GetFieldListProcessor {
    fn action(&self) -> &'static str {
        "mgr/field/getlist"
    }

    async fn run(
        &self,
        host: &dyn Host,
        _registry: &ProcessorRegistry,
        props: &Properties,
    ) -> Result<ProcessorResponse, ProcessorError> {
        let query = FieldListQuery {
            start: props::get_u64(props, "start")?,
            limit: props::get_u64(props, "limit")?,
            query: props::get_string(props, "query"),
        };
        let (items, total) = service::list(host, &query).await?;
        Ok(ProcessorResponse::list(total, serde_json::to_value(&items)?))
    }
}
