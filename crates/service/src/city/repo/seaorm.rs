use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::city::domain::{City, NewCity, State};
use crate::city::errors::CityError;
use crate::city::repository::{CityRepository, StateRepository};
use crate::pagination::Pagination;

impl From<models::city::Model> for City {
    fn from(m: models::city::Model) -> Self {
        City {
            id: m.id,
            name: m.name,
            state_id: m.state_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
            deleted_at: m.deleted_at,
        }
    }
}

impl From<models::state::Model> for State {
    fn from(m: models::state::Model) -> Self {
        State { id: m.id, name: m.name, initials: m.initials, created_at: m.created_at, updated_at: m.updated_at }
    }
}

/// SeaORM-backed city repository.
pub struct SeaOrmCityRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl CityRepository for SeaOrmCityRepository {
    async fn get_by_id(&self, id: i32) -> Result<Option<City>, CityError> {
        let found = models::city::find_active_by_id(&self.db, id).await?;
        Ok(found.map(City::from))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<City>, CityError> {
        let found = models::city::find_active_by_name(&self.db, name).await?;
        Ok(found.map(City::from))
    }

    async fn list(&self, page: Pagination) -> Result<Vec<City>, CityError> {
        let (page_idx, per_page) = page.normalize();
        let rows = models::city::list_active(&self.db, page_idx, per_page).await?;
        Ok(rows.into_iter().map(City::from).collect())
    }

    async fn create(&self, input: NewCity) -> Result<City, CityError> {
        let created = models::city::create(&self.db, &input.name, input.state_id).await?;
        Ok(created.into())
    }

    async fn update(&self, city: City) -> Result<City, CityError> {
        let updated = models::city::update(&self.db, city.id, &city.name, city.state_id).await?;
        Ok(updated.into())
    }

    async fn soft_delete(&self, city: &City) -> Result<bool, CityError> {
        Ok(models::city::soft_delete(&self.db, city.id).await?)
    }
}

/// SeaORM-backed state repository.
pub struct SeaOrmStateRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl StateRepository for SeaOrmStateRepository {
    async fn get_by_id(&self, id: i32) -> Result<Option<State>, CityError> {
        let found = models::state::find_by_id(&self.db, id).await?;
        Ok(found.map(State::from))
    }

    async fn list_all(&self) -> Result<Vec<State>, CityError> {
        let rows = models::state::list_all(&self.db).await?;
        Ok(rows.into_iter().map(State::from).collect())
    }
}
