//! Post-install check: the database is reachable, the component tables are
//! there and a field can be written, read back and removed.
//!
//! Prints `[verify]` lines and exits with status 1 at the first failed check.

use backend::domain::{a001_field, a002_field_value};
use backend::shared::config;
use backend::shared::data::db;
use clap::Parser;
use contracts::domain::a001_field::aggregate::{Field, FieldId};
use sea_orm::{ActiveModelBehavior, ActiveModelTrait, DatabaseConnection};
use std::path::PathBuf;

const TEST_FIELD_NAME: &str = "verification_test_field";
const TEST_FIELD_RANK: i32 = 999;

#[derive(Parser, Debug)]
#[command(name = "extrafields-verify", version, about = "Verify an ExtraFields installation")]
struct Args {
    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database URL; takes precedence over the configuration
    #[arg(long)]
    database_url: Option<String>,
}

fn pass(message: impl AsRef<str>) {
    println!("[verify] ✅ {}", message.as_ref());
}

fn fail(message: impl AsRef<str>) -> ! {
    println!("[verify] ❌ {}", message.as_ref());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("[verify] Starting ExtraFields installation verification");
    println!("[verify] Version: {}", env!("CARGO_PKG_VERSION"));

    let url = match args.database_url {
        Some(url) => url,
        None => match config::discover_config(args.config.as_deref()) {
            Ok(config) => config.database_url(),
            Err(e) => fail(format!("{} ({})", e, e.code())),
        },
    };

    let conn = match db::connect(&url).await {
        Ok(conn) => conn,
        Err(e) => fail(format!("Could not connect to the database: {}", e)),
    };
    if let Err(e) = conn.ping().await {
        fail(format!("Database does not answer: {}", e));
    }
    pass("Database connection works");

    check_tables(&conn).await;
    check_blank_objects();
    smoke_test(&conn).await;

    println!("[verify] All checks passed");
    Ok(())
}

async fn check_tables(conn: &DatabaseConnection) {
    for table in [a001_field::repository::TABLE, a002_field_value::repository::TABLE] {
        match db::table_exists(conn, table).await {
            Ok(true) => {}
            Ok(false) => fail(format!("Table {} does not exist", table)),
            Err(e) => fail(format!("Could not check table {}: {}", table, e)),
        }
    }
    pass("Database tables exist");
}

fn check_blank_objects() {
    let field = <a001_field::repository::ActiveModel as ActiveModelBehavior>::new();
    let value = <a002_field_value::repository::ActiveModel as ActiveModelBehavior>::new();
    if field.is_changed() || value.is_changed() {
        fail("Blank Field/Value objects carry unexpected state");
    }
    pass("Blank Field/Value objects can be created");
}

/// Create, read back and delete one field
async fn smoke_test(conn: &DatabaseConnection) {
    if let Err(e) = remove_leftover(conn).await {
        fail(e);
    }

    let draft = Field::new_for_insert(
        TEST_FIELD_NAME.to_string(),
        Some("Test field created during verification".to_string()),
        TEST_FIELD_RANK,
    );
    let created = match a001_field::repository::insert(conn, &draft).await {
        Ok(field) => field,
        Err(e) => fail(format!("Could not save test field: {}", e)),
    };
    pass(format!("Created test field with ID: {}", created.id));

    // удаляем до вывода результата чтения, чтобы не оставить тестовое поле
    let read_back = read_back(conn, created.id).await;
    let removed = remove_test_field(conn, created.id).await;

    match read_back {
        Ok(()) => pass("Retrieved test field"),
        Err(e) => fail(e),
    }
    match removed {
        Ok(()) => pass("Deleted test field"),
        Err(e) => fail(e),
    }
}

/// Test field left over from an interrupted run
async fn remove_leftover(conn: &DatabaseConnection) -> Result<(), String> {
    let stale = a001_field::repository::find_by_name(conn, TEST_FIELD_NAME, None)
        .await
        .map_err(|e| format!("Could not look up a leftover test field: {}", e))?;

    match stale {
        Some(field) => remove_test_field(conn, field.id)
            .await
            .map_err(|e| format!("Leftover from an earlier run: {}", e)),
        None => Ok(()),
    }
}

async fn read_back(conn: &DatabaseConnection, id: FieldId) -> Result<(), String> {
    match a001_field::repository::get_by_id(conn, id).await {
        Ok(Some(field)) if field.name == TEST_FIELD_NAME && field.rank == TEST_FIELD_RANK => Ok(()),
        Ok(_) => Err(format!("Could not retrieve test field with ID: {}", id)),
        Err(e) => Err(format!("Could not retrieve test field: {}", e)),
    }
}

async fn remove_test_field(conn: &DatabaseConnection, id: FieldId) -> Result<(), String> {
    match a001_field::repository::delete(conn, id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(format!("Could not delete test field with ID: {}", id)),
        Err(e) => Err(format!("Could not delete test field: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ConnectionTrait;

    async fn provisioned(dir: &tempfile::TempDir) -> DatabaseConnection {
        let url = config::build_sqlite_url(&dir.path().join("verify.db"));
        db::initialize_database(&url).await.unwrap()
    }

    async fn insert_test_field(conn: &DatabaseConnection, rank: i32) -> Field {
        let draft = Field::new_for_insert(TEST_FIELD_NAME.to_string(), None, rank);
        a001_field::repository::insert(conn, &draft).await.unwrap()
    }

    #[tokio::test]
    async fn test_leftover_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let conn = provisioned(&dir).await;
        insert_test_field(&conn, TEST_FIELD_RANK).await;

        remove_leftover(&conn).await.unwrap();

        let left = a001_field::repository::find_by_name(&conn, TEST_FIELD_NAME, None)
            .await
            .unwrap();
        assert!(left.is_none());
    }

    #[tokio::test]
    async fn test_leftover_that_cannot_be_removed_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let conn = provisioned(&dir).await;
        let stale = insert_test_field(&conn, TEST_FIELD_RANK).await;
        conn.execute_unprepared(
            "CREATE TRIGGER keep_fields BEFORE DELETE ON extrafields_fields \
             BEGIN SELECT RAISE(IGNORE); END",
        )
        .await
        .unwrap();

        let err = remove_leftover(&conn).await.unwrap_err();
        assert_eq!(
            err,
            format!(
                "Leftover from an earlier run: Could not delete test field with ID: {}",
                stale.id
            )
        );
    }

    #[tokio::test]
    async fn test_failed_read_back_still_allows_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let conn = provisioned(&dir).await;
        let created = insert_test_field(&conn, 1).await;

        // wrong rank: read back fails, removal still runs
        assert!(read_back(&conn, created.id).await.is_err());
        remove_test_field(&conn, created.id).await.unwrap();

        assert_eq!(a001_field::repository::count(&conn).await.unwrap(), 0);
    }
}
