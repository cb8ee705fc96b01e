use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use service::city::domain::{City, CityPatch, ImportReport, NewCity, State as StateRecord, IMPORT_SUCCESS};
use service::pagination::Pagination;
use tracing::info;

use crate::{errors::JsonApiError, routes::AppState};

#[derive(Debug, Serialize)]
pub struct MessageOutput {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ImportOutput {
    pub message: &'static str,
    #[serde(flatten)]
    pub report: ImportReport,
}

/// Path ids arrive as raw text so a non-integer is rejected before any lookup.
fn parse_id(raw: &str) -> Result<i32, JsonApiError> {
    raw.trim().parse::<i32>().map_err(|_| JsonApiError::invalid_id())
}

/// An id segment that fails to decode at all is reported the same way as a non-integer one.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<i32, JsonApiError> {
    let Path(raw) = path.map_err(|_| JsonApiError::invalid_id())?;
    parse_id(&raw)
}

#[utoipa::path(
    get, path = "/city/{id}", tag = "cities",
    params(("id" = String, Path, description = "City ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CityDoc),
        (status = 400, description = "FieldMustBeNumber", body = crate::openapi::ErrorDoc),
        (status = 404, description = "cityNotFound", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<City>, JsonApiError> {
    let id = path_id(id)?;
    let city = state.cities.find_by_id(id).await?;
    Ok(Json(city))
}

#[utoipa::path(
    get, path = "/city", tag = "cities",
    params(
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("per_page" = Option<u32>, Query, description = "Page size (1..=100)")
    ),
    responses((status = 200, description = "List OK", body = [crate::openapi::CityDoc]))
)]
pub async fn list(
    State(state): State<AppState>,
    page: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<City>>, JsonApiError> {
    let Query(page) = page?;
    let cities = state.cities.list(page).await?;
    info!(count = cities.len(), page = page.page, "list cities");
    Ok(Json(cities))
}

#[utoipa::path(
    post, path = "/city/create", tag = "cities",
    request_body = crate::openapi::CreateCityInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CityDoc),
        (status = 400, description = "ValidationFailed / entityWithArgumentsExists / cityNotSave", body = crate::openapi::ErrorDoc),
        (status = 404, description = "stateNotFound", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewCity>, JsonRejection>,
) -> Result<(StatusCode, Json<City>), JsonApiError> {
    let Json(input) = payload?;
    info!(name = %input.name, state_id = input.state_id, "city_create_request");
    let city = state.cities.create_city(input).await?;
    Ok((StatusCode::CREATED, Json(city)))
}

#[utoipa::path(
    patch, path = "/city/update/{id}", tag = "cities",
    params(("id" = String, Path, description = "City ID")),
    request_body = crate::openapi::UpdateCityInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CityDoc),
        (status = 400, description = "FieldMustBeNumber / ValidationFailed / cityNotUpdate", body = crate::openapi::ErrorDoc),
        (status = 404, description = "cityNotFound / stateNotFound", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<CityPatch>, JsonRejection>,
) -> Result<Json<City>, JsonApiError> {
    let id = path_id(id)?;
    let Json(patch) = payload?;
    let city = state.cities.update_city(id, patch).await?;
    Ok(Json(city))
}

#[utoipa::path(
    delete, path = "/city/{id}", tag = "cities",
    params(("id" = String, Path, description = "City ID")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 400, description = "FieldMustBeNumber", body = crate::openapi::ErrorDoc),
        (status = 404, description = "cityNotFound / CityNotDelete", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageOutput>, JsonApiError> {
    let id = path_id(id)?;
    let message = state.cities.delete_city(id).await?;
    Ok(Json(MessageOutput { message }))
}

#[utoipa::path(
    post, path = "/city/createAllCities", tag = "cities",
    responses(
        (status = 200, description = "Import finished", body = crate::openapi::ImportOutputDoc),
        (status = 502, description = "municipalitiesUnavailable", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_all(State(state): State<AppState>) -> Result<Json<ImportOutput>, JsonApiError> {
    info!("municipality_import_request");
    let report = state.cities.import_all(state.municipalities.as_ref()).await?;
    Ok(Json(ImportOutput { message: IMPORT_SUCCESS, report }))
}

#[utoipa::path(
    get, path = "/state", tag = "states",
    responses((status = 200, description = "List OK", body = [crate::openapi::StateDoc]))
)]
pub async fn list_states(State(state): State<AppState>) -> Result<Json<Vec<StateRecord>>, JsonApiError> {
    Ok(Json(state.cities.list_states().await?))
}
