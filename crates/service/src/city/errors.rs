use thiserror::Error;

use models::errors::ModelError;

/// Business errors for city workflows
#[derive(Debug, Error)]
pub enum CityError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("city not found")]
    NotFound,
    #[error("state not found")]
    StateNotFound,
    #[error("a city with this name already exists")]
    Conflict,
    #[error("city could not be saved")]
    NotSaved,
    #[error("city could not be updated")]
    NotUpdated,
    #[error("city could not be deleted")]
    NotDeleted,
    #[error("municipality source error: {0}")]
    Upstream(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl CityError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            CityError::Validation(_) => 2001,
            CityError::NotFound => 2002,
            CityError::StateNotFound => 2003,
            CityError::Conflict => 2004,
            CityError::NotSaved => 2101,
            CityError::NotUpdated => 2102,
            CityError::NotDeleted => 2103,
            CityError::Upstream(_) => 2201,
            CityError::Repository(_) => 2300,
        }
    }

    /// Fixed message token sent to API clients.
    pub fn token(&self) -> &'static str {
        match self {
            CityError::Validation(_) => "ValidationFailed",
            CityError::NotFound => "cityNotFound",
            CityError::StateNotFound => "stateNotFound",
            CityError::Conflict => "entityWithArgumentsExists",
            CityError::NotSaved => "cityNotSave",
            CityError::NotUpdated => "cityNotUpdate",
            CityError::NotDeleted => "CityNotDelete",
            CityError::Upstream(_) => "municipalitiesUnavailable",
            CityError::Repository(_) => "databaseError",
        }
    }
}

impl From<ModelError> for CityError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => CityError::Validation(msg),
            ModelError::NotFound(_) => CityError::NotFound,
            ModelError::Conflict(_) => CityError::Conflict,
            ModelError::Db(msg) => CityError::Repository(msg),
        }
    }
}
