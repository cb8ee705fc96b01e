use chrono::Utc;
use sea_orm::{entity::prelude::*, sea_query::Expr, DatabaseConnection, PaginatorTrait, QueryOrder, Select, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, state};

pub const NAME_MAX_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "city")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub state_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { State }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::State => Entity::belongs_to(state::Entity)
                .from(Column::StateId)
                .to(state::Column::Id)
                .into(),
        }
    }
}

impl Related<state::Entity> for Entity {
    fn to() -> RelationDef { Relation::State.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trim and check a city name; returns the value that gets stored.
pub fn validate_name(name: &str) -> Result<String, errors::ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("name longer than {NAME_MAX_LEN} characters")));
    }
    Ok(trimmed.to_string())
}

pub fn validate_state_id(state_id: i32) -> Result<(), errors::ModelError> {
    if state_id <= 0 {
        return Err(errors::ModelError::Validation("state_id must be a positive integer".into()));
    }
    Ok(())
}

fn active() -> Select<Entity> {
    Entity::find().filter(Column::DeletedAt.is_null())
}

/// Find a city that has not been soft-deleted.
pub async fn find_active_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Ok(active().filter(Column::Id.eq(id)).one(db).await?)
}

pub async fn find_active_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(active().filter(Column::Name.eq(name)).one(db).await?)
}

/// Page through live cities ordered by id; `page_idx` is 0-based.
pub async fn list_active(db: &DatabaseConnection, page_idx: u64, per_page: u64) -> Result<Vec<Model>, errors::ModelError> {
    let rows = active()
        .order_by_asc(Column::Id)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?;
    Ok(rows)
}

pub async fn create(db: &DatabaseConnection, name: &str, state_id: i32) -> Result<Model, errors::ModelError> {
    let name = validate_name(name)?;
    validate_state_id(state_id)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        name: Set(name),
        state_id: Set(state_id),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Overwrite the mutable columns of a live city.
pub async fn update(db: &DatabaseConnection, id: i32, name: &str, state_id: i32) -> Result<Model, errors::ModelError> {
    let name = validate_name(name)?;
    validate_state_id(state_id)?;
    let mut found: ActiveModel = find_active_by_id(db, id)
        .await?
        .ok_or_else(|| errors::ModelError::NotFound(format!("city {id}")))?
        .into();
    found.name = Set(name);
    found.state_id = Set(state_id);
    found.updated_at = Set(Utc::now().into());
    Ok(found.update(db).await?)
}

/// Mark a city deleted; returns false when no live row matched.
pub async fn soft_delete(db: &DatabaseConnection, id: i32) -> Result<bool, errors::ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::DeletedAt, Expr::value(now))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Column::DeletedAt.is_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

pub async fn hard_delete(db: &DatabaseConnection, id: i32) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
