use async_trait::async_trait;

use super::domain::{City, NewCity, State};
use super::errors::CityError;
use crate::pagination::Pagination;

/// Repository abstraction for city persistence. Reads never return soft-deleted rows.
#[async_trait]
pub trait CityRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> Result<Option<City>, CityError>;
    async fn get_by_name(&self, name: &str) -> Result<Option<City>, CityError>;
    async fn list(&self, page: Pagination) -> Result<Vec<City>, CityError>;
    async fn create(&self, input: NewCity) -> Result<City, CityError>;
    async fn update(&self, city: City) -> Result<City, CityError>;
    async fn soft_delete(&self, city: &City) -> Result<bool, CityError>;
}

/// Read access to states, used for FK checks and the import lookup.
#[async_trait]
pub trait StateRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> Result<Option<State>, CityError>;
    async fn list_all(&self) -> Result<Vec<State>, CityError>;
}

/// Simple in-memory mock repositories for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Build a live city stamped with the current time.
    pub fn city(id: i32, name: &str, state_id: i32) -> City {
        let now = Utc::now().into();
        City { id, name: name.to_string(), state_id, created_at: now, updated_at: now, deleted_at: None }
    }

    pub fn state(id: i32, name: &str, initials: &str) -> State {
        let now = Utc::now().into();
        State { id, name: name.to_string(), initials: initials.to_string(), created_at: now, updated_at: now }
    }

    #[derive(Default)]
    pub struct MockCityRepository {
        cities: Mutex<BTreeMap<i32, City>>, // key: id, soft-deleted rows included
        lookups: AtomicUsize,
        create_calls: AtomicUsize,
        fail_writes: AtomicBool,
    }

    impl MockCityRepository {
        pub fn with_cities(cities: impl IntoIterator<Item = City>) -> Self {
            let repo = Self::default();
            repo.cities.lock().unwrap().extend(cities.into_iter().map(|c| (c.id, c)));
            repo
        }

        /// Number of `get_by_id` calls served.
        pub fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }

        /// Number of times the persistence create path was invoked.
        pub fn create_calls(&self) -> usize {
            self.create_calls.load(Ordering::SeqCst)
        }

        /// Make every subsequent write fail as a database error would.
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Stored row regardless of soft-delete state.
        pub fn stored(&self, id: i32) -> Option<City> {
            self.cities.lock().unwrap().get(&id).cloned()
        }

        fn check_writable(&self) -> Result<(), CityError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(CityError::Repository("write rejected".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CityRepository for MockCityRepository {
        async fn get_by_id(&self, id: i32) -> Result<Option<City>, CityError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            let cities = self.cities.lock().unwrap();
            Ok(cities.get(&id).filter(|c| c.deleted_at.is_none()).cloned())
        }

        async fn get_by_name(&self, name: &str) -> Result<Option<City>, CityError> {
            let cities = self.cities.lock().unwrap();
            Ok(cities.values().find(|c| c.deleted_at.is_none() && c.name == name).cloned())
        }

        async fn list(&self, page: Pagination) -> Result<Vec<City>, CityError> {
            let (page_idx, per_page) = page.normalize();
            let cities = self.cities.lock().unwrap();
            Ok(cities
                .values()
                .filter(|c| c.deleted_at.is_none())
                .skip((page_idx * per_page) as usize)
                .take(per_page as usize)
                .cloned()
                .collect())
        }

        async fn create(&self, input: NewCity) -> Result<City, CityError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.check_writable()?;
            let mut cities = self.cities.lock().unwrap();
            if cities.values().any(|c| c.deleted_at.is_none() && c.name == input.name) {
                return Err(CityError::Conflict);
            }
            let id = cities.keys().next_back().copied().unwrap_or(0) + 1;
            let created = city(id, &input.name, input.state_id);
            cities.insert(id, created.clone());
            Ok(created)
        }

        async fn update(&self, city: City) -> Result<City, CityError> {
            self.check_writable()?;
            let mut cities = self.cities.lock().unwrap();
            if cities.values().any(|c| c.deleted_at.is_none() && c.id != city.id && c.name == city.name) {
                return Err(CityError::Conflict);
            }
            let Some(existing) = cities.get_mut(&city.id).filter(|c| c.deleted_at.is_none()) else {
                return Err(CityError::Repository("city not found".into()));
            };
            existing.name = city.name;
            existing.state_id = city.state_id;
            existing.updated_at = Utc::now().into();
            Ok(existing.clone())
        }

        async fn soft_delete(&self, city: &City) -> Result<bool, CityError> {
            self.check_writable()?;
            let mut cities = self.cities.lock().unwrap();
            match cities.get_mut(&city.id).filter(|c| c.deleted_at.is_none()) {
                Some(existing) => {
                    existing.deleted_at = Some(Utc::now().into());
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    #[derive(Default)]
    pub struct MockStateRepository {
        states: Mutex<BTreeMap<i32, State>>, // key: id
    }

    impl MockStateRepository {
        pub fn with_states(states: impl IntoIterator<Item = State>) -> Self {
            let repo = Self::default();
            repo.states.lock().unwrap().extend(states.into_iter().map(|s| (s.id, s)));
            repo
        }
    }

    #[async_trait]
    impl StateRepository for MockStateRepository {
        async fn get_by_id(&self, id: i32) -> Result<Option<State>, CityError> {
            Ok(self.states.lock().unwrap().get(&id).cloned())
        }

        async fn list_all(&self) -> Result<Vec<State>, CityError> {
            Ok(self.states.lock().unwrap().values().cloned().collect())
        }
    }
}
