use contracts::domain::a001_field::aggregate::FieldId;
use contracts::domain::a002_field_value::aggregate::FieldValue;
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::domain::a001_field;

pub const TABLE: &str = "extrafields_values";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "extrafields_values")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub field_id: i32,
    pub resource_id: i32,
    #[sea_orm(column_type = "Text")]
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for FieldValue {
    fn from(m: Model) -> Self {
        FieldValue {
            id: m.id,
            field_id: FieldId(m.field_id),
            resource_id: m.resource_id,
            value: m.value,
        }
    }
}

pub async fn get<C: ConnectionTrait>(
    db: &C,
    field_id: FieldId,
    resource_id: i32,
) -> Result<Option<FieldValue>, DbErr> {
    let result = Entity::find()
        .filter(Column::FieldId.eq(field_id.value()))
        .filter(Column::ResourceId.eq(resource_id))
        .one(db)
        .await?;
    Ok(result.map(Into::into))
}

/// Insert or update in one statement. The unique index on
/// (field_id, resource_id) turns a concurrent second insert into an update.
/// The row is only produced while the field exists, so a value can never
/// outlive a field removed by a concurrent delete; zero affected rows then.
pub async fn upsert<C: ConnectionTrait>(
    db: &C,
    field_id: FieldId,
    resource_id: i32,
    value: &str,
) -> Result<u64, DbErr> {
    let field_exists = Query::select()
        .expr(Expr::val(1))
        .from(a001_field::repository::Entity)
        .and_where(
            Expr::col((a001_field::repository::Entity, a001_field::repository::Column::Id))
                .eq(field_id.value()),
        )
        .to_owned();

    let row = Query::select()
        .exprs([
            Expr::val(field_id.value()),
            Expr::val(resource_id),
            Expr::val(value.to_string()),
        ])
        .and_where(Expr::exists(field_exists))
        .to_owned();

    let mut insert = Query::insert();
    insert
        .into_table(Entity)
        .columns([Column::FieldId, Column::ResourceId, Column::Value])
        .select_from(row)
        .map_err(|e| DbErr::Custom(format!("Cannot build value upsert: {}", e)))?
        .on_conflict(
            OnConflict::columns([Column::FieldId, Column::ResourceId])
                .update_column(Column::Value)
                .to_owned(),
        );

    let result = db.execute(db.get_database_backend().build(&insert)).await?;
    Ok(result.rows_affected())
}

pub async fn list_for_resource<C: ConnectionTrait>(
    db: &C,
    resource_id: i32,
) -> Result<Vec<FieldValue>, DbErr> {
    let items = Entity::find()
        .filter(Column::ResourceId.eq(resource_id))
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn delete_for_field<C: ConnectionTrait>(db: &C, field_id: FieldId) -> Result<u64, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::FieldId.eq(field_id.value()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    Entity::find().count(db).await
}
