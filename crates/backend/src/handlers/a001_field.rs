use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::domain::a001_field::aggregate::{Field, FieldDto, FieldId, FieldListQuery};
use serde_json::{json, Value};

use super::ApiResult;
use crate::domain::a001_field;
use crate::routes::AppState;
use crate::shared::error::ProcessorError;

/// GET /api/fields
pub async fn list_all(
    State(state): State<AppState>,
    Query(query): Query<FieldListQuery>,
) -> ApiResult<Value> {
    let (items, total) = a001_field::service::list(state.host(), &query).await?;
    Ok(Json(json!({ "total": total, "items": items })))
}

/// GET /api/fields/:id
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Field> {
    match a001_field::service::get_by_id(state.host(), FieldId(id)).await? {
        Some(field) => Ok(Json(field)),
        None => Err(ProcessorError::NotFound.into()),
    }
}

/// POST /api/fields
pub async fn create(State(state): State<AppState>, Json(dto): Json<FieldDto>) -> ApiResult<Field> {
    let field = a001_field::service::create(state.host(), &dto).await?;
    Ok(Json(field))
}

/// PUT /api/fields/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(dto): Json<FieldDto>,
) -> ApiResult<Field> {
    let field = a001_field::service::update(state.host(), FieldId(id), &dto).await?;
    Ok(Json(field))
}

/// DELETE /api/fields/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Field> {
    let field = a001_field::service::delete(state.host(), FieldId(id)).await?;
    Ok(Json(field))
}
