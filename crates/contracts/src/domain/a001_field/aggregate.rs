use serde::{Deserialize, Serialize};

use crate::domain::common::{AggregateId, AggregateRoot};

// ============================================================================
// ID Type
// ============================================================================

/// Идентификатор поля
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(pub i32);

impl FieldId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl AggregateId for FieldId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        <i32 as AggregateId>::from_string(s).map(FieldId::new)
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Поле, определённое администратором: именованный текстовый слот,
/// хранящий одно значение на каждый ресурс.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    pub description: Option<String>,
    pub rank: i32,
}

impl Field {
    /// Создать новое поле для вставки в БД (id назначает база)
    pub fn new_for_insert(name: String, description: Option<String>, rank: i32) -> Self {
        Self {
            id: FieldId::default(),
            name,
            description,
            rank,
        }
    }

    /// Обновить данные из DTO. Отсутствующий rank оставляет текущий.
    pub fn update(&mut self, dto: &FieldDto) {
        self.name = dto.name.clone();
        self.description = dto.description.clone();
        if let Some(rank) = dto.rank {
            self.rank = rank;
        }
    }

    /// Валидация данных, не требующая обращения к БД
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Field name must not be empty".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        let trimmed = self.name.trim();
        if trimmed.len() != self.name.len() {
            self.name = trimmed.to_string();
        }
        if matches!(self.description.as_deref(), Some(d) if d.trim().is_empty()) {
            self.description = None;
        }
    }
}

impl AggregateRoot for Field {
    type Id = FieldId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "fields"
    }

    fn element_name() -> &'static str {
        "Field"
    }

    fn list_name() -> &'static str {
        "Fields"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления поля
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FieldDto {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rank: Option<i32>,
}

/// Параметры списка полей
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FieldListQuery {
    #[serde(default)]
    pub start: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    /// Фильтр по подстроке имени
    #[serde(default)]
    pub query: Option<String>,
}
