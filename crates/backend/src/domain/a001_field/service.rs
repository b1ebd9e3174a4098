use contracts::domain::a001_field::aggregate::{Field, FieldDto, FieldId, FieldListQuery};
use contracts::shared::logger::LogLevel;
use sea_orm::TransactionTrait;

use super::{repository, validation};
use crate::domain::a002_field_value;
use crate::shared::error::ProcessorError;
use crate::shared::host::Host;

pub const PERMISSION_SAVE: &str = "extrafields.field_save";
pub const PERMISSION_REMOVE: &str = "extrafields.field_remove";

/// Хук перед сохранением: проверка прав
pub fn before_save(host: &dyn Host) -> Result<(), ProcessorError> {
    if host.has_permission(PERMISSION_SAVE) {
        Ok(())
    } else {
        Err(ProcessorError::PermissionDenied(PERMISSION_SAVE.to_string()))
    }
}

fn snapshot(field: &Field) -> String {
    serde_json::to_string(field).unwrap_or_else(|_| format!("{:?}", field))
}

/// Создание нового поля
pub async fn create(host: &dyn Host, dto: &FieldDto) -> Result<Field, ProcessorError> {
    let rank = dto
        .rank
        .unwrap_or_else(|| host.option_i32("default_rank", 0));
    let mut aggregate = Field::new_for_insert(dto.name.clone(), dto.description.clone(), rank);

    // Валидация
    validation::before_set(host, &aggregate.name, None).await?;

    // Подготовка к записи
    aggregate.before_write();
    before_save(host)?;

    // Сохранение через repository
    let saved = repository::insert(host.db(), &aggregate).await?;
    tracing::info!("Created field {} ({})", saved.id, saved.name);
    Ok(saved)
}

/// Обновление существующего поля
pub async fn update(host: &dyn Host, id: FieldId, dto: &FieldDto) -> Result<Field, ProcessorError> {
    let mut aggregate = repository::get_by_id(host.db(), id)
        .await?
        .ok_or(ProcessorError::NotFound)?;

    // Валидация: отдельная фаза, до любых хуков сохранения
    validation::before_set(host, &dto.name, Some(id)).await?;

    aggregate.update(dto);
    aggregate.before_write();
    before_save(host)?;

    if !repository::update(host.db(), &aggregate).await? {
        host.log(
            LogLevel::Error,
            &format!("Failed to update field: no rows updated | Object data: {}", snapshot(&aggregate)),
            "a001_field::update",
        )
        .await;
        return Err(ProcessorError::Persistence {
            detail: Some(format!(
                "No rows updated for field {}. No validation errors reported; check the server log.",
                aggregate.id
            )),
        });
    }

    // after_save
    tracing::info!("Updated field {} ({})", aggregate.id, aggregate.name);
    Ok(aggregate)
}

/// Удаление поля вместе с его значениями
///
/// Значения поля удаляются в той же транзакции (каскад).
pub async fn delete(host: &dyn Host, id: FieldId) -> Result<Field, ProcessorError> {
    let aggregate = repository::get_by_id(host.db(), id)
        .await?
        .ok_or(ProcessorError::NotFound)?;

    if !host.has_permission(PERMISSION_REMOVE) {
        return Err(ProcessorError::PermissionDenied(PERMISSION_REMOVE.to_string()));
    }

    let txn = host.db().begin().await?;

    // before_remove
    let removed_values = a002_field_value::repository::delete_for_field(&txn, id).await?;

    if !repository::delete(&txn, id).await? {
        txn.rollback().await?;
        host.log(
            LogLevel::Error,
            &format!("Failed to delete field: no rows removed | Object data: {}", snapshot(&aggregate)),
            "a001_field::delete",
        )
        .await;
        return Err(ProcessorError::Persistence { detail: None });
    }

    txn.commit().await?;

    // after_remove
    tracing::info!(
        "Removed field {} ({}) with {} value(s)",
        aggregate.id,
        aggregate.name,
        removed_values
    );
    Ok(aggregate)
}

/// Получение поля по ID
pub async fn get_by_id(host: &dyn Host, id: FieldId) -> Result<Option<Field>, ProcessorError> {
    Ok(repository::get_by_id(host.db(), id).await?)
}

/// Получение списка полей
pub async fn list(
    host: &dyn Host,
    query: &FieldListQuery,
) -> Result<(Vec<Field>, u64), ProcessorError> {
    Ok(repository::list(host.db(), query).await?)
}
