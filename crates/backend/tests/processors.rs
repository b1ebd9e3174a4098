//! Processors as the connector runs them: request properties in, envelope out.

mod common;

use backend::processors::{ProcessorRegistry, Properties};
use backend::shared::host::Host;
use backend::shared::logger;
use contracts::shared::processor::ProcessorResponse;
use serde_json::{json, Value};

use common::{create_field, drop_table, ignore_writes, setup, setup_with, TestEnv};

fn props(value: Value) -> Properties {
    value.as_object().cloned().unwrap_or_default()
}

async fn run(env: &TestEnv, action: &str, value: Value) -> ProcessorResponse {
    ProcessorRegistry::with_defaults()
        .run(action, env.host(), &props(value))
        .await
        .unwrap_or_else(|| panic!("no processor for {}", action))
}

#[tokio::test]
async fn test_create_returns_object() {
    let env = setup().await;

    let resp = run(
        &env,
        "mgr/field/create",
        json!({"name": "bio", "description": "About", "rank": "4"}),
    )
    .await;

    assert!(resp.success, "{:?}", resp);
    let object = resp.object.unwrap();
    assert_eq!(object["name"], "bio");
    assert_eq!(object["rank"], 4);
    assert!(object["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_create_duplicate_reports_field_error() {
    let env = setup().await;
    create_field(&env, "bio", 0).await;

    let resp = run(&env, "mgr/field/create", json!({"name": "bio"})).await;

    assert!(!resp.success);
    assert_eq!(resp.message, "An error occurred while saving the field.");
    assert_eq!(resp.errors.len(), 1);
    assert_eq!(resp.errors[0].id, "name");
    assert_eq!(
        resp.errors[0].msg,
        "A field already exists with the name \"bio\"."
    );
}

#[tokio::test]
async fn test_update_with_string_id() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;

    let resp = run(
        &env,
        "mgr/field/update",
        json!({"id": field.id.to_string(), "name": "biography", "rank": 3}),
    )
    .await;

    assert!(resp.success, "{:?}", resp);
    assert_eq!(resp.object.unwrap()["name"], "biography");
}

#[tokio::test]
async fn test_update_duplicate_is_rejected() {
    let env = setup().await;
    create_field(&env, "bio", 0).await;
    let notes = create_field(&env, "notes", 0).await;

    let resp = run(
        &env,
        "mgr/field/update",
        json!({"id": notes.id.value(), "name": "bio"}),
    )
    .await;

    assert!(!resp.success);
    assert_eq!(resp.errors[0].id, "name");
}

#[tokio::test]
async fn test_update_and_delete_missing_are_not_found() {
    let env = setup().await;

    for action in ["mgr/field/update", "mgr/field/delete", "mgr/field/get"] {
        let resp = run(&env, action, json!({"id": 404, "name": "ghost"})).await;
        assert!(!resp.success);
        assert_eq!(resp.message, "Field not found.", "{}", action);
    }

    let resp = run(&env, "mgr/field/delete", json!({})).await;
    assert_eq!(resp.message, "Field not found.");
}

#[tokio::test]
async fn test_delete_without_permission() {
    let env = setup_with(|config| config.permissions.granted.clear()).await;
    let field = create_field_unchecked(&env, "bio").await;

    let resp = run(&env, "mgr/field/delete", json!({"id": field})).await;
    assert!(!resp.success);
    assert_eq!(resp.message, "Access denied.");

    let entries = logger::repository::get_logs(env.host().db(), None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, "warn");
    assert_eq!(entries[0].context, "mgr/field/delete");
}

/// Insert a field directly, bypassing the permission check of the service
async fn create_field_unchecked(env: &TestEnv, name: &str) -> i32 {
    use backend::domain::a001_field::repository;
    use contracts::domain::a001_field::aggregate::Field;

    let field = Field::new_for_insert(name.to_string(), None, 0);
    repository::insert(env.host().db(), &field)
        .await
        .unwrap()
        .id
        .value()
}

#[tokio::test]
async fn test_getlist_returns_results_and_total() {
    let env = setup().await;
    for name in ["a", "b", "c"] {
        create_field(&env, name, 0).await;
    }

    let resp = run(&env, "mgr/field/getlist", json!({"start": 1, "limit": "1"})).await;

    assert!(resp.success);
    assert_eq!(resp.total, Some(3));
    let results = resp.results.unwrap();
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["name"], "b");
}

#[tokio::test]
async fn test_value_set_get_and_list() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;

    let resp = run(
        &env,
        "mgr/value/set",
        json!({"field_id": field.id.value(), "resource_id": "7", "value": "hello"}),
    )
    .await;
    assert!(resp.success, "{:?}", resp);

    let resp = run(
        &env,
        "mgr/value/get",
        json!({"field_id": field.id.value(), "resource_id": 7}),
    )
    .await;
    assert_eq!(resp.object.unwrap()["value"], "hello");

    let resp = run(&env, "mgr/value/getlist", json!({"resource_id": 7})).await;
    assert_eq!(resp.total, Some(1));
    assert_eq!(resp.results.unwrap()[0]["value"], "hello");
}

#[tokio::test]
async fn test_value_set_requires_ids() {
    let env = setup().await;

    let resp = run(&env, "mgr/value/set", json!({"value": "x"})).await;
    assert!(!resp.success);
    assert_eq!(resp.errors[0].id, "field_id");

    let resp = run(
        &env,
        "mgr/value/set",
        json!({"field_id": 1, "resource_id": "abc"}),
    )
    .await;
    assert_eq!(resp.errors[0].id, "resource_id");
}

#[tokio::test]
async fn test_storage_error_carries_sql_code() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;
    drop_table(&env, "extrafields_values").await;

    let resp = run(
        &env,
        "mgr/value/set",
        json!({"field_id": field.id.value(), "resource_id": 1, "value": "x"}),
    )
    .await;

    assert!(!resp.success);
    assert!(
        resp.message
            .starts_with("An error occurred while saving the value. SQL Error ("),
        "{}",
        resp.message
    );
    assert!(resp.message.contains("extrafields_values"));

    let entries = logger::repository::get_logs(env.host().db(), None)
        .await
        .unwrap();
    assert!(entries
        .iter()
        .any(|e| e.level == "error" && e.context == "mgr/value/set"));
}

#[tokio::test]
async fn test_update_without_affected_rows_reports_and_logs() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;
    ignore_writes(&env, "extrafields_fields", "UPDATE").await;

    let resp = run(
        &env,
        "mgr/field/update",
        json!({"id": field.id.value(), "name": "biography"}),
    )
    .await;

    assert!(!resp.success);
    assert_eq!(
        resp.message,
        format!(
            "An error occurred while saving the field. No rows updated for field {}. \
             No validation errors reported; check the server log.",
            field.id
        )
    );

    let entries = logger::repository::get_logs(env.host().db(), None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, "error");
    assert_eq!(entries[0].context, "a001_field::update");
    assert!(entries[0].message.contains("Object data: {"), "{}", entries[0].message);
    assert!(entries[0].message.contains("\"name\":\"biography\""));
}

#[tokio::test]
async fn test_delete_without_affected_rows_rolls_back() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;
    run(
        &env,
        "mgr/value/set",
        json!({"field_id": field.id.value(), "resource_id": 1, "value": "kept"}),
    )
    .await;
    ignore_writes(&env, "extrafields_fields", "DELETE").await;

    let resp = run(&env, "mgr/field/delete", json!({"id": field.id.value()})).await;

    assert!(!resp.success);
    assert_eq!(
        resp.message,
        "An error occurred while removing the field. \
         No specific error details available; check the server log."
    );

    // the cascaded value delete was rolled back with the field delete
    let resp = run(
        &env,
        "mgr/value/get",
        json!({"field_id": field.id.value(), "resource_id": 1}),
    )
    .await;
    assert_eq!(resp.object.unwrap()["value"], "kept");

    let entries = logger::repository::get_logs(env.host().db(), None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].context, "a001_field::delete");
    assert!(entries[0].message.contains("\"name\":\"bio\""));
}

#[tokio::test]
async fn test_value_set_without_affected_rows() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;
    ignore_writes(&env, "extrafields_values", "INSERT").await;

    let resp = run(
        &env,
        "mgr/value/set",
        json!({"field_id": field.id.value(), "resource_id": 3, "value": "lost"}),
    )
    .await;

    assert!(!resp.success);
    assert_eq!(
        resp.message,
        format!(
            "An error occurred while saving the value. No rows written for field {} / resource 3",
            field.id
        )
    );

    let entries = logger::repository::get_logs(env.host().db(), None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].context, "mgr/value/set");
}

#[tokio::test]
async fn test_diagnostics_processor() {
    let env = setup().await;

    let resp = run(&env, "mgr/diagnostics/run", json!({})).await;

    assert!(resp.success, "{:?}", resp);
    assert_eq!(resp.message, "Diagnostics passed.");
    let report = resp.object.unwrap();
    assert_eq!(report["ok"], true);
    assert!(!report["log"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_action_has_no_processor() {
    let env = setup().await;

    let resp = ProcessorRegistry::with_defaults()
        .run("mgr/field/explode", env.host(), &Properties::new())
        .await;
    assert!(resp.is_none());
}
