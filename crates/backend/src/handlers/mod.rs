pub mod a001_field;
pub mod a002_field_value;
pub mod connector;
pub mod diagnostics;
pub mod logs;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::processor::ProcessorResponse;

use crate::shared::error::ProcessorError;

/// Ошибка REST-обработчика: статус по виду ошибки, тело в формате ответа процессора
#[derive(Debug)]
pub struct ApiError(pub ProcessorError);

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl From<ProcessorError> for ApiError {
    fn from(err: ProcessorError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ProcessorError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ProcessorError::NotFound => StatusCode::NOT_FOUND,
            ProcessorError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ProcessorError::Persistence { .. }
            | ProcessorError::Storage { .. }
            | ProcessorError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("REST request failed: {}", self.0);
        }

        let errors = self.0.field_errors().to_vec();
        let body = ProcessorResponse::failure(self.0.to_string(), errors);
        (status, Json(body)).into_response()
    }
}
