use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::{city, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "state")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub initials: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { City }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::City => Entity::has_many(city::Entity).into() }
    }
}

impl Related<city::Entity> for Entity {
    fn to() -> RelationDef { Relation::City.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_initials(db: &DatabaseConnection, initials: &str) -> Result<Option<Model>, errors::ModelError> {
    let found = Entity::find()
        .filter(Column::Initials.eq(initials.to_ascii_uppercase()))
        .one(db)
        .await?;
    Ok(found)
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}
