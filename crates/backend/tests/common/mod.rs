#![allow(dead_code)]

use backend::domain::a001_field;
use backend::shared::config::{build_sqlite_url, Config};
use backend::shared::data::db;
use backend::shared::host::{AppContext, Host};
use contracts::domain::a001_field::aggregate::{Field, FieldDto};
use sea_orm::ConnectionTrait;
use std::sync::Arc;
use tempfile::TempDir;

/// Provisioned component on a throwaway SQLite file
pub struct TestEnv {
    pub dir: TempDir,
    pub ctx: Arc<AppContext>,
}

impl TestEnv {
    pub fn host(&self) -> &dyn Host {
        &*self.ctx
    }
}

pub async fn setup() -> TestEnv {
    setup_with(|_| {}).await
}

/// Like [`setup`], with a chance to adjust the configuration first
pub async fn setup_with(adjust: impl FnOnce(&mut Config)) -> TestEnv {
    let dir = tempfile::tempdir().unwrap();

    let component_dir = dir.path().join("component");
    std::fs::create_dir_all(component_dir.join("lexicon")).unwrap();

    let mut config = Config::default();
    config.database.url = Some(build_sqlite_url(&dir.path().join("extrafields.db")));
    config.component.path = component_dir;
    adjust(&mut config);

    let conn = db::initialize_database(&config.database_url()).await.unwrap();
    let ctx = Arc::new(AppContext::from_config(config, conn));

    TestEnv { dir, ctx }
}

pub fn dto(name: &str, rank: Option<i32>) -> FieldDto {
    FieldDto {
        id: None,
        name: name.to_string(),
        description: None,
        rank,
    }
}

pub async fn create_field(env: &TestEnv, name: &str, rank: i32) -> Field {
    a001_field::service::create(env.host(), &dto(name, Some(rank)))
        .await
        .unwrap()
}

pub async fn drop_table(env: &TestEnv, table: &str) {
    env.ctx
        .db()
        .execute_unprepared(&format!("DROP TABLE {}", table))
        .await
        .unwrap();
}

/// Trigger that turns every `event` (INSERT, UPDATE, DELETE) on `table` into a
/// no-op, so the statement succeeds with zero affected rows
pub async fn ignore_writes(env: &TestEnv, table: &str, event: &str) {
    env.ctx
        .db()
        .execute_unprepared(&format!(
            "CREATE TRIGGER ignore_{}_{} BEFORE {} ON {} BEGIN SELECT RAISE(IGNORE); END",
            event.to_lowercase(),
            table,
            event,
            table
        ))
        .await
        .unwrap();
}
