use axum::extract::{Path, State};
use axum::Json;
use contracts::domain::a001_field::aggregate::FieldId;
use contracts::domain::a002_field_value::aggregate::{ResourceFieldValue, SetValueDto};
use serde_json::{json, Value};

use super::ApiResult;
use crate::domain::a002_field_value;
use crate::routes::AppState;
use crate::shared::error::ProcessorError;

/// GET /api/values/:field_id/:resource_id
pub async fn get_value(
    State(state): State<AppState>,
    Path((field_id, resource_id)): Path<(i32, i32)>,
) -> ApiResult<Value> {
    let value =
        a002_field_value::service::get_value(state.host(), FieldId(field_id), resource_id).await?;
    Ok(Json(json!({
        "field_id": field_id,
        "resource_id": resource_id,
        "value": value,
    })))
}

/// PUT /api/values/:field_id/:resource_id
pub async fn set_value(
    State(state): State<AppState>,
    Path((field_id, resource_id)): Path<(i32, i32)>,
    Json(dto): Json<SetValueDto>,
) -> ApiResult<Value> {
    let written = a002_field_value::service::set_value(
        state.host(),
        FieldId(field_id),
        resource_id,
        &dto.value,
    )
    .await?;

    if !written {
        return Err(ProcessorError::Persistence {
            detail: Some(format!(
                "No rows written for field {} / resource {}",
                field_id, resource_id
            )),
        }
        .into());
    }

    Ok(Json(json!({
        "field_id": field_id,
        "resource_id": resource_id,
        "value": dto.value,
    })))
}

/// GET /api/resources/:id/values
pub async fn list_for_resource(
    State(state): State<AppState>,
    Path(resource_id): Path<i32>,
) -> ApiResult<Vec<ResourceFieldValue>> {
    let items = a002_field_value::service::list_for_resource(state.host(), resource_id).await?;
    Ok(Json(items))
}
