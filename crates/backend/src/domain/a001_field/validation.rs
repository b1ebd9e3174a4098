use contracts::domain::a001_field::aggregate::FieldId;
use contracts::shared::processor::FieldErrorEntry;

use super::repository;
use crate::shared::error::ProcessorError;
use crate::shared::host::Host;

/// Фаза валидации (before_set).
///
/// Сама проверяет уникальность имени и завершается до хуков сохранения и записи.
/// `exclude` - ID обновляемой записи.
pub async fn before_set(
    host: &dyn Host,
    name: &str,
    exclude: Option<FieldId>,
) -> Result<(), ProcessorError> {
    let mut errors = Vec::new();
    let name = name.trim();

    if name.is_empty() {
        errors.push(FieldErrorEntry::new(
            "name",
            host.lexicon("extrafields.field_err_ns_name", &[]),
        ));
    } else if repository::find_by_name(host.db(), name, exclude)
        .await?
        .is_some()
    {
        errors.push(FieldErrorEntry::new(
            "name",
            host.lexicon("extrafields.field_err_ae", &[("name", name)]),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ProcessorError::Validation(errors))
    }
}
