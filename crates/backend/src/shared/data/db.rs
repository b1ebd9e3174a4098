use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Schema,
    Statement,
};

use crate::domain::{a001_field, a002_field_value};
use crate::shared::logger;

/// Name of the unique index that makes the value upsert atomic
pub const VALUE_UNIQUE_INDEX: &str = "uq_extrafields_values_field_resource";

/// Connect to the database. For SQLite files the parent directory is created.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    if let Some(path) = sqlite_file_path(url) {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DbErr::Custom(format!("Cannot create {}: {}", parent.display(), e)))?;
            }
        }
    }

    let mut options = ConnectOptions::new(url.to_string());
    options.sqlx_logging(false);
    Database::connect(options).await
}

/// Connect and make sure every table of the component exists
pub async fn initialize_database(url: &str) -> Result<DatabaseConnection, DbErr> {
    let conn = connect(url).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(path)
    }
}

/// DDL for the component tables, built for the given backend
pub fn schema_statements(backend: DatabaseBackend) -> Vec<(String, Statement)> {
    let schema = Schema::new(backend);

    let mut fields = schema.create_table_from_entity(a001_field::repository::Entity);
    fields.if_not_exists();

    let mut values = schema.create_table_from_entity(a002_field_value::repository::Entity);
    values.if_not_exists();

    let mut log = schema.create_table_from_entity(logger::repository::Entity);
    log.if_not_exists();

    let values_unique = Index::create()
        .name(VALUE_UNIQUE_INDEX)
        .table(a002_field_value::repository::Entity)
        .col(a002_field_value::repository::Column::FieldId)
        .col(a002_field_value::repository::Column::ResourceId)
        .unique()
        .if_not_exists()
        .to_owned();

    vec![
        (a001_field::repository::TABLE.to_string(), backend.build(&fields)),
        (a002_field_value::repository::TABLE.to_string(), backend.build(&values)),
        (VALUE_UNIQUE_INDEX.to_string(), backend.build(&values_unique)),
        (logger::repository::TABLE.to_string(), backend.build(&log)),
    ]
}

/// Create missing tables and indexes. Existing ones are left untouched.
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    for (name, statement) in schema_statements(backend) {
        if name != VALUE_UNIQUE_INDEX && table_exists(db, &name).await? {
            tracing::debug!("Table {} already exists", name);
            continue;
        }
        tracing::info!("Creating {}", name);
        db.execute(statement).await?;
    }
    Ok(())
}

/// Check the backend catalogue for a table, without going through the entity
pub async fn table_exists<C: ConnectionTrait>(db: &C, table: &str) -> Result<bool, DbErr> {
    let backend = db.get_database_backend();
    let statement = match backend {
        DatabaseBackend::Sqlite => Statement::from_sql_and_values(
            backend,
            "SELECT COUNT(*) AS cnt FROM sqlite_master WHERE type = 'table' AND name = ?",
            [table.into()],
        ),
        DatabaseBackend::Postgres => Statement::from_sql_and_values(
            backend,
            "SELECT COUNT(*) AS cnt FROM information_schema.tables WHERE table_name = $1",
            [table.into()],
        ),
        DatabaseBackend::MySql => {
            let rows = db
                .query_all(Statement::from_sql_and_values(
                    backend,
                    "SHOW TABLES LIKE ?",
                    [table.into()],
                ))
                .await?;
            return Ok(!rows.is_empty());
        }
    };

    let count = match db.query_one(statement).await? {
        Some(row) => row.try_get::<i64>("", "cnt")?,
        None => 0,
    };
    Ok(count > 0)
}
