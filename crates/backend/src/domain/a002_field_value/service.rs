use contracts::domain::a001_field::aggregate::FieldId;
use contracts::domain::a002_field_value::aggregate::ResourceFieldValue;
use std::collections::HashMap;

use super::repository;
use crate::domain::a001_field;
use crate::shared::error::ProcessorError;
use crate::shared::host::Host;

/// Значение поля для ресурса. Если записи нет, возвращается пустая строка, а не ошибка.
pub async fn get_value(
    host: &dyn Host,
    field_id: FieldId,
    resource_id: i32,
) -> Result<String, ProcessorError> {
    let value = repository::get(host.db(), field_id, resource_id).await?;
    Ok(value.map(|v| v.value).unwrap_or_default())
}

/// Записать значение (upsert). Поле должно существовать.
///
/// Проверка поля входит в тот же оператор, поэтому удалённое параллельно
/// поле не оставит осиротевшего значения.
pub async fn set_value(
    host: &dyn Host,
    field_id: FieldId,
    resource_id: i32,
    text: &str,
) -> Result<bool, ProcessorError> {
    let rows = repository::upsert(host.db(), field_id, resource_id, text).await?;
    if rows == 0
        && a001_field::repository::get_by_id(host.db(), field_id)
            .await?
            .is_none()
    {
        return Err(ProcessorError::NotFound);
    }
    tracing::debug!(
        "Stored value for field {} / resource {} ({} bytes)",
        field_id,
        resource_id,
        text.len()
    );
    Ok(rows > 0)
}

/// Все поля (по rank) с их значениями для одного ресурса
pub async fn list_for_resource(
    host: &dyn Host,
    resource_id: i32,
) -> Result<Vec<ResourceFieldValue>, ProcessorError> {
    let fields = a001_field::repository::list_all(host.db()).await?;
    let mut values: HashMap<FieldId, String> = repository::list_for_resource(host.db(), resource_id)
        .await?
        .into_iter()
        .map(|v| (v.field_id, v.value))
        .collect();

    Ok(fields
        .into_iter()
        .map(|field| {
            let value = values.remove(&field.id).unwrap_or_default();
            ResourceFieldValue { field, value }
        })
        .collect())
}
