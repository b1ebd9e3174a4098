use contracts::domain::a001_field::aggregate::{Field, FieldId, FieldListQuery};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};

pub const TABLE: &str = "extrafields_fields";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "extrafields_fields")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub rank: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Field {
    fn from(m: Model) -> Self {
        Field {
            id: FieldId(m.id),
            name: m.name,
            description: m.description,
            rank: m.rank,
        }
    }
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: FieldId) -> Result<Option<Field>, DbErr> {
    let result = Entity::find_by_id(id.value()).one(db).await?;
    Ok(result.map(Into::into))
}

/// Exact, case-sensitive name lookup, optionally ignoring one record
pub async fn find_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
    exclude: Option<FieldId>,
) -> Result<Option<Field>, DbErr> {
    let mut query = Entity::find().filter(Column::Name.eq(name));
    if let Some(id) = exclude {
        query = query.filter(Column::Id.ne(id.value()));
    }
    let result = query.one(db).await?;
    Ok(result.map(Into::into))
}

/// Fields ordered by rank, then name. Returns the page and the unpaged total.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    params: &FieldListQuery,
) -> Result<(Vec<Field>, u64), DbErr> {
    let mut query = Entity::find();
    if let Some(needle) = params.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        query = query.filter(Column::Name.contains(needle));
    }

    let total = query.clone().count(db).await?;

    let mut query = query
        .order_by_asc(Column::Rank)
        .order_by_asc(Column::Name);
    if let Some(start) = params.start {
        query = query.offset(start);
    }
    if let Some(limit) = params.limit.filter(|l| *l > 0) {
        query = query.limit(limit);
    }

    let items = query
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}

pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Field>, DbErr> {
    list(db, &FieldListQuery::default()).await.map(|(items, _)| items)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    Entity::find().count(db).await
}

pub async fn insert<C: ConnectionTrait>(db: &C, aggregate: &Field) -> Result<Field, DbErr> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        name: Set(aggregate.name.clone()),
        description: Set(aggregate.description.clone()),
        rank: Set(aggregate.rank),
    };
    let model = active.insert(db).await?;
    Ok(model.into())
}

/// Returns false when no row matched the id
pub async fn update<C: ConnectionTrait>(db: &C, aggregate: &Field) -> Result<bool, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::Name, Expr::value(aggregate.name.clone()))
        .col_expr(Column::Description, Expr::value(aggregate.description.clone()))
        .col_expr(Column::Rank, Expr::value(aggregate.rank))
        .filter(Column::Id.eq(aggregate.id.value()))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Returns false when no row matched the id
pub async fn delete<C: ConnectionTrait>(db: &C, id: FieldId) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id.value()).exec(db).await?;
    Ok(result.rows_affected > 0)
}
