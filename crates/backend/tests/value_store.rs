//! Value store: one value per (field, resource), written by atomic upsert.

mod common;

use backend::domain::{a001_field, a002_field_value};
use backend::shared::error::ProcessorError;
use backend::shared::host::Host;
use contracts::domain::a001_field::aggregate::FieldId;
use sea_orm::{ActiveModelTrait, Set};

use common::{create_field, setup};

#[tokio::test]
async fn test_get_before_set_is_empty() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;

    let value = a002_field_value::service::get_value(env.host(), field.id, 1)
        .await
        .unwrap();
    assert_eq!(value, "");
}

#[tokio::test]
async fn test_get_for_unknown_field_is_empty() {
    let env = setup().await;

    let value = a002_field_value::service::get_value(env.host(), FieldId(77), 1)
        .await
        .unwrap();
    assert_eq!(value, "");
}

#[tokio::test]
async fn test_set_then_get() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;
    let text = "Line one\nLine two with <b>markup</b> & \"quotes\"";

    assert!(a002_field_value::service::set_value(env.host(), field.id, 10, text)
        .await
        .unwrap());
    assert_eq!(
        a002_field_value::service::get_value(env.host(), field.id, 10)
            .await
            .unwrap(),
        text
    );
    assert_eq!(
        a002_field_value::service::get_value(env.host(), field.id, 11)
            .await
            .unwrap(),
        ""
    );
}

#[tokio::test]
async fn test_set_twice_keeps_one_row_with_last_text() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;

    a002_field_value::service::set_value(env.host(), field.id, 1, "first")
        .await
        .unwrap();
    a002_field_value::service::set_value(env.host(), field.id, 1, "second")
        .await
        .unwrap();

    assert_eq!(
        a002_field_value::repository::count(env.host().db()).await.unwrap(),
        1
    );
    assert_eq!(
        a002_field_value::service::get_value(env.host(), field.id, 1)
            .await
            .unwrap(),
        "second"
    );
}

#[tokio::test]
async fn test_set_empty_text_is_stored() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;

    a002_field_value::service::set_value(env.host(), field.id, 1, "text")
        .await
        .unwrap();
    a002_field_value::service::set_value(env.host(), field.id, 1, "")
        .await
        .unwrap();

    let stored = a002_field_value::repository::get(env.host().db(), field.id, 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.value, "");
}

#[tokio::test]
async fn test_set_for_missing_field_is_not_found() {
    let env = setup().await;

    let err = a002_field_value::service::set_value(env.host(), FieldId(404), 1, "orphan")
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessorError::NotFound));
    assert_eq!(
        a002_field_value::repository::count(env.host().db()).await.unwrap(),
        0
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_leave_one_row() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;

    let mut tasks = Vec::new();
    for i in 0..16 {
        let ctx = env.ctx.clone();
        let field_id = field.id;
        tasks.push(tokio::spawn(async move {
            let text = format!("writer {}", i);
            a002_field_value::service::set_value(&*ctx, field_id, 5, &text).await
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().unwrap());
    }

    assert_eq!(
        a002_field_value::repository::count(env.host().db()).await.unwrap(),
        1
    );
    let value = a002_field_value::service::get_value(env.host(), field.id, 5)
        .await
        .unwrap();
    assert!(value.starts_with("writer "));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_writers_racing_a_delete_leave_no_orphans() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;

    let mut tasks = Vec::new();
    for resource_id in 0..16 {
        let ctx = env.ctx.clone();
        let field_id = field.id;
        tasks.push(tokio::spawn(async move {
            a002_field_value::service::set_value(&*ctx, field_id, resource_id, "late").await
        }));
    }
    a001_field::service::delete(env.host(), field.id).await.unwrap();

    for task in tasks {
        let result = task.await.unwrap();
        assert!(
            matches!(result, Ok(true) | Err(ProcessorError::NotFound)),
            "{:?}",
            result
        );
    }
    assert_eq!(
        a002_field_value::repository::count(env.host().db()).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_unique_index_rejects_raw_duplicate() {
    let env = setup().await;
    let field = create_field(&env, "bio", 0).await;
    let db = env.host().db();

    let row = || a002_field_value::repository::ActiveModel {
        field_id: Set(field.id.value()),
        resource_id: Set(1),
        value: Set("raw".into()),
        ..Default::default()
    };

    row().insert(db).await.unwrap();
    assert!(row().insert(db).await.is_err());
}

#[tokio::test]
async fn test_list_for_resource_pairs_every_field() {
    let env = setup().await;
    let bio = create_field(&env, "bio", 1).await;
    let notes = create_field(&env, "notes", 0).await;

    a002_field_value::service::set_value(env.host(), bio.id, 3, "hello")
        .await
        .unwrap();
    a002_field_value::service::set_value(env.host(), bio.id, 4, "other resource")
        .await
        .unwrap();

    let items = a002_field_value::service::list_for_resource(env.host(), 3)
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].field.id, notes.id);
    assert_eq!(items[0].value, "");
    assert_eq!(items[1].field.id, bio.id);
    assert_eq!(items[1].value, "hello");
}

/// bio / hello / world, end to end
#[tokio::test]
async fn test_field_value_lifecycle() {
    let env = setup().await;
    let host = env.host();

    let bio = create_field(&env, "bio", 0).await;
    assert_eq!(
        a002_field_value::service::get_value(host, bio.id, 1).await.unwrap(),
        ""
    );

    a002_field_value::service::set_value(host, bio.id, 1, "hello")
        .await
        .unwrap();
    assert_eq!(
        a002_field_value::service::get_value(host, bio.id, 1).await.unwrap(),
        "hello"
    );

    a002_field_value::service::set_value(host, bio.id, 1, "world")
        .await
        .unwrap();
    assert_eq!(
        a002_field_value::service::get_value(host, bio.id, 1).await.unwrap(),
        "world"
    );
    assert_eq!(a002_field_value::repository::count(host.db()).await.unwrap(), 1);

    a001_field::service::delete(host, bio.id).await.unwrap();
    assert_eq!(
        a002_field_value::service::get_value(host, bio.id, 1).await.unwrap(),
        ""
    );
    assert_eq!(a002_field_value::repository::count(host.db()).await.unwrap(), 0);
}
