//! `/connector?action=...`: the single entry point of the admin UI.
//!
//! The action name is checked against a fixed pattern before any lookup,
//! then the matching processor runs with the request properties. Query
//! parameters and the POST body (JSON object or urlencoded form) are merged,
//! body values winning.

use axum::extract::{FromRequest, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use contracts::shared::processor::{error_codes, ConnectorError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Once;

use crate::processors::Properties;
use crate::routes::AppState;

static ACTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_\-/]+$").expect("action pattern is a valid regex"));

pub fn is_valid_action(action: &str) -> bool {
    ACTION_PATTERN.is_match(action)
}

/// GET /connector
pub async fn handle_get(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let (action, props) = split_query(query);
    dispatch(&state, action, props).await
}

/// POST /connector
pub async fn handle_post(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    req: Request,
) -> Response {
    let (mut action, mut props) = split_query(query);

    let body = match read_body(req).await {
        Ok(body) => body,
        Err(response) => return response,
    };

    for (key, value) in body {
        if key == "action" {
            if action.is_none() {
                action = value.as_str().map(str::to_string);
            }
            continue;
        }
        props.insert(key, value);
    }

    dispatch(&state, action, props).await
}

async fn dispatch(state: &AppState, action: Option<String>, props: Properties) -> Response {
    let action = action.unwrap_or_default();

    if !is_valid_action(&action) {
        tracing::warn!("Connector rejected action {:?}", action);
        return connector_error(
            StatusCode::BAD_REQUEST,
            ConnectorError::new(error_codes::INVALID_ACTION, "Invalid action specified."),
        );
    }

    match state.registry.run(&action, state.host(), &props).await {
        Some(response) => Json(response).into_response(),
        None => {
            tracing::warn!("Connector: no processor for action {}", action);
            connector_error(
                StatusCode::NOT_FOUND,
                ConnectorError::new(
                    error_codes::PROCESSOR_EXECUTION_FAILED,
                    format!("Processor not found for action: {}", action),
                ),
            )
        }
    }
}

fn split_query(query: HashMap<String, String>) -> (Option<String>, Properties) {
    let mut action = None;
    let mut props = Properties::new();
    for (key, value) in query {
        if key == "action" {
            action = Some(value);
        } else {
            props.insert(key, Value::String(value));
        }
    }
    (action, props)
}

async fn read_body(req: Request) -> Result<Properties, Response> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        let Json(body) = Json::<Value>::from_request(req, &())
            .await
            .map_err(|rejection| malformed_body(rejection.body_text()))?;
        return match body {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Properties::new()),
            _ => Err(malformed_body("JSON body must be an object".to_string())),
        };
    }

    if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(form) = Form::<HashMap<String, String>>::from_request(req, &())
            .await
            .map_err(|rejection| malformed_body(rejection.body_text()))?;
        return Ok(form
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect());
    }

    Ok(Properties::new())
}

fn malformed_body(details: String) -> Response {
    connector_error(
        StatusCode::BAD_REQUEST,
        ConnectorError::new(
            error_codes::PROCESSOR_EXECUTION_FAILED,
            "Malformed request body.",
        )
        .with_details(details),
    )
}

fn connector_error(status: StatusCode, body: ConnectorError) -> Response {
    (status, Json(body)).into_response()
}

thread_local! {
    static PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Remember where the last panic on this thread happened, so the connector
/// can report `file:line` next to the panic message. Idempotent.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if let Some(location) = info.location() {
                let location = format!("{}:{}", location.file(), location.line());
                PANIC_LOCATION.with(|cell| *cell.borrow_mut() = Some(location));
            }
            previous(info);
        }));
    });
}

/// Response for a panic caught inside the connector
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    let location = PANIC_LOCATION.with(|cell| cell.borrow_mut().take());
    tracing::error!(
        "Connector caught a panic: {} at {}",
        message,
        location.as_deref().unwrap_or("unknown location")
    );

    let mut body = ConnectorError::new(error_codes::EXCEPTION_CAUGHT, message);
    if let Some(location) = location {
        body = body.with_details(location);
    }
    connector_error(StatusCode::INTERNAL_SERVER_ERROR, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_pattern() {
        assert!(is_valid_action("mgr/field/update"));
        assert!(is_valid_action("mgr/value-get_2"));
        assert!(!is_valid_action(""));
        assert!(!is_valid_action("../x"));
        assert!(!is_valid_action("mgr/field update"));
        assert!(!is_valid_action("mgr\\field"));
    }

    #[test]
    fn test_split_query_takes_action_out() {
        let mut query = HashMap::new();
        query.insert("action".to_string(), "mgr/field/get".to_string());
        query.insert("id".to_string(), "3".to_string());

        let (action, props) = split_query(query);
        assert_eq!(action.as_deref(), Some("mgr/field/get"));
        assert_eq!(props.get("id"), Some(&Value::String("3".into())));
        assert!(!props.contains_key("action"));
    }

    #[test]
    fn test_panic_response_uses_message() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
