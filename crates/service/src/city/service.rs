use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use super::domain::{City, CityPatch, ImportReport, NewCity, State, DELETE_SUCCESS};
use super::errors::CityError;
use super::repository::{CityRepository, StateRepository};
use super::source::MunicipalitySource;
use crate::pagination::Pagination;

/// City business service independent of web framework
pub struct CityService {
    cities: Arc<dyn CityRepository>,
    states: Arc<dyn StateRepository>,
}

impl CityService {
    pub fn new(cities: Arc<dyn CityRepository>, states: Arc<dyn StateRepository>) -> Self {
        Self { cities, states }
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<City, CityError> {
        self.cities.get_by_id(id).await?.ok_or(CityError::NotFound)
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<City>, CityError> {
        self.cities.list(page).await
    }

    pub async fn list_states(&self) -> Result<Vec<State>, CityError> {
        self.states.list_all().await
    }

    /// Create a city whose name is not yet taken, under an existing state.
    ///
    /// # Examples
    /// ```
    /// use service::city::{service::CityService, domain::NewCity};
    /// use service::city::repository::mock::{state, MockCityRepository, MockStateRepository};
    /// use std::sync::Arc;
    /// let cities = Arc::new(MockCityRepository::default());
    /// let states = Arc::new(MockStateRepository::with_states([state(1, "São Paulo", "SP")]));
    /// let svc = CityService::new(cities, states);
    /// let city = tokio_test::block_on(svc.create_city(NewCity { name: "Campinas".into(), state_id: 1 })).unwrap();
    /// assert_eq!(city.name, "Campinas");
    /// assert_eq!(city.state_id, 1);
    /// ```
    #[instrument(skip(self, input), fields(name = %input.name, state_id = input.state_id))]
    pub async fn create_city(&self, input: NewCity) -> Result<City, CityError> {
        let name = models::city::validate_name(&input.name)?;
        models::city::validate_state_id(input.state_id)?;

        self.ensure_name_free(&name, None).await?;
        self.ensure_state_exists(input.state_id).await?;
        self.persist(NewCity { name, state_id: input.state_id }).await
    }

    /// Merge the supplied fields into an existing city and persist the result.
    #[instrument(skip(self, patch))]
    pub async fn update_city(&self, id: i32, patch: CityPatch) -> Result<City, CityError> {
        let name = patch.name.as_deref().map(models::city::validate_name).transpose()?;
        if let Some(state_id) = patch.state_id {
            models::city::validate_state_id(state_id)?;
        }

        let found = self.find_by_id(id).await?;
        if patch.is_empty() {
            return Ok(found);
        }
        if let Some(name) = name.as_deref().filter(|n| *n != found.name) {
            self.ensure_name_free(name, Some(id)).await?;
        }
        if let Some(state_id) = patch.state_id.filter(|s| *s != found.state_id) {
            self.ensure_state_exists(state_id).await?;
        }

        let merged = City {
            name: name.unwrap_or_else(|| found.name.clone()),
            state_id: patch.state_id.unwrap_or(found.state_id),
            ..found
        };
        match self.cities.update(merged).await {
            Ok(updated) => {
                info!(city_id = updated.id, "city_updated");
                Ok(updated)
            }
            Err(CityError::Conflict) => Err(CityError::Conflict),
            Err(e) => {
                error!(city_id = id, error = %e, "city update failed");
                Err(CityError::NotUpdated)
            }
        }
    }

    /// Soft-delete a city and return the fixed success indicator.
    #[instrument(skip(self))]
    pub async fn delete_city(&self, id: i32) -> Result<&'static str, CityError> {
        let found = self.find_by_id(id).await?;
        match self.cities.soft_delete(&found).await {
            Ok(true) => {
                info!(city_id = id, "city_deleted");
                Ok(DELETE_SUCCESS)
            }
            Ok(false) => Err(CityError::NotDeleted),
            Err(e) => {
                error!(city_id = id, error = %e, "city delete failed");
                Err(CityError::NotDeleted)
            }
        }
    }

    /// Pull the remote municipality listing and create one city per entry whose
    /// region code matches a local state. Rows are written one at a time; each
    /// skipped or failed row is counted in the report.
    #[instrument(skip(self, source))]
    pub async fn import_all(&self, source: &dyn MunicipalitySource) -> Result<ImportReport, CityError> {
        let municipalities = source.fetch_all().await?;
        let by_initials: HashMap<String, i32> = self
            .states
            .list_all()
            .await?
            .into_iter()
            .map(|s| (s.initials.to_ascii_uppercase(), s.id))
            .collect();

        let mut report = ImportReport { fetched: municipalities.len(), ..ImportReport::default() };
        for m in municipalities {
            let state_id = m
                .uf_initials()
                .and_then(|uf| by_initials.get(&uf.to_ascii_uppercase()))
                .copied();
            let Some(state_id) = state_id else {
                report.unmatched += 1;
                warn!(municipality_id = m.id, city = %m.name, uf = ?m.uf_initials(), "no local state for municipality");
                continue;
            };

            match self.import_one(&m.name, state_id).await {
                Ok(_) => report.created += 1,
                Err(CityError::Conflict) => {
                    report.duplicates += 1;
                    debug!(city = %m.name, "municipality already imported");
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(municipality_id = m.id, city = %m.name, code = e.code(), error = %e, "municipality import failed");
                }
            }
        }

        info!(
            fetched = report.fetched,
            created = report.created,
            duplicates = report.duplicates,
            unmatched = report.unmatched,
            failed = report.failed,
            "municipality import finished"
        );
        Ok(report)
    }

    async fn import_one(&self, name: &str, state_id: i32) -> Result<City, CityError> {
        let name = models::city::validate_name(name)?;
        self.ensure_name_free(&name, None).await?;
        self.persist(NewCity { name, state_id }).await
    }

    async fn ensure_name_free(&self, name: &str, owner: Option<i32>) -> Result<(), CityError> {
        match self.cities.get_by_name(name).await? {
            Some(existing) if Some(existing.id) != owner => {
                debug!(existing_id = existing.id, "city name taken");
                Err(CityError::Conflict)
            }
            _ => Ok(()),
        }
    }

    async fn ensure_state_exists(&self, state_id: i32) -> Result<(), CityError> {
        self.states
            .get_by_id(state_id)
            .await?
            .map(|_| ())
            .ok_or(CityError::StateNotFound)
    }

    async fn persist(&self, input: NewCity) -> Result<City, CityError> {
        let name = input.name.clone();
        match self.cities.create(input).await {
            Ok(created) => {
                info!(city_id = created.id, state_id = created.state_id, "city_created");
                Ok(created)
            }
            // lost a race with a concurrent insert of the same name
            Err(CityError::Conflict) => {
                warn!(name = %name, "city name taken at insert");
                Err(CityError::Conflict)
            }
            Err(e) => {
                error!(error = %e, "city create failed");
                Err(CityError::NotSaved)
            }
        }
    }
}
