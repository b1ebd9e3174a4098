use serde::{Deserialize, Serialize};

use crate::domain::a001_field::aggregate::{Field, FieldId};
use crate::domain::common::AggregateRoot;

/// Текстовое значение поля для конкретного ресурса
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub id: i32,
    pub field_id: FieldId,
    pub resource_id: i32,
    pub value: String,
}

impl FieldValue {
    pub fn new_for_insert(field_id: FieldId, resource_id: i32, value: String) -> Self {
        Self {
            id: 0,
            field_id,
            resource_id,
            value,
        }
    }
}

impl AggregateRoot for FieldValue {
    type Id = i32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "values"
    }

    fn element_name() -> &'static str {
        "Field value"
    }

    fn list_name() -> &'static str {
        "Field values"
    }
}

/// DTO для записи значения
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SetValueDto {
    #[serde(default)]
    pub value: String,
}

/// Поле вместе с его значением для одного ресурса (пустая строка, если не задано)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceFieldValue {
    pub field: Field,
    pub value: String,
}
