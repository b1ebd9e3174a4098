use chrono::Utc;
use contracts::shared::logger::{LogEntry, LogLevel};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect, Set};

pub const TABLE: &str = "extrafields_log";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "extrafields_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub timestamp: String,
    pub level: String,
    pub context: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LogEntry {
    fn from(m: Model) -> Self {
        LogEntry {
            id: i64::from(m.id),
            timestamp: m.timestamp,
            level: m.level,
            context: m.context,
            message: m.message,
        }
    }
}

/// Добавить запись в лог
pub async fn log_event<C: ConnectionTrait>(
    db: &C,
    level: LogLevel,
    context: &str,
    message: &str,
) -> Result<(), DbErr> {
    let now = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();

    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        timestamp: Set(now),
        level: Set(level.as_str().to_string()),
        context: Set(context.to_string()),
        message: Set(message.to_string()),
    };

    active.insert(db).await?;
    Ok(())
}

/// Получить записи лога (новые сверху)
pub async fn get_logs<C: ConnectionTrait>(db: &C, limit: Option<u64>) -> Result<Vec<LogEntry>, DbErr> {
    let mut query = Entity::find().order_by_desc(Column::Id);
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    let logs = query
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(logs)
}

/// Очистить все записи лога
pub async fn clear_all_logs<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    let result = Entity::delete_many().exec(db).await?;
    Ok(result.rows_affected)
}
