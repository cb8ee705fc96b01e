use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes::{self, AppState};
use service::city::domain::{City, Municipality};
use service::city::repository::mock::{city, state, MockCityRepository, MockStateRepository};
use service::city::source::{mock::StaticMunicipalitySource, MunicipalitySource};
use service::city::CityService;

struct TestApp {
    router: Router,
    cities: Arc<MockCityRepository>,
}

fn build_app(existing: Vec<City>, source: StaticMunicipalitySource) -> TestApp {
    let cities = Arc::new(MockCityRepository::with_cities(existing));
    let states = Arc::new(MockStateRepository::with_states([
        state(1, "São Paulo", "SP"),
        state(2, "Rio de Janeiro", "RJ"),
    ]));
    let municipalities: Arc<dyn MunicipalitySource> = Arc::new(source);
    let app_state = AppState {
        cities: Arc::new(CityService::new(cities.clone(), states)),
        municipalities,
    };
    TestApp { router: routes::build_router(app_state, CorsLayer::very_permissive()), cities }
}

fn app_with(existing: Vec<City>) -> TestApp {
    build_app(existing, StaticMunicipalitySource::new(Vec::new()))
}

async fn send(app: &TestApp, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let body = match body {
        Some(v) => Body::from(serde_json::to_vec(&v)?),
        None => Body::empty(),
    };
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)?;
    let resp = app.router.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, json))
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let app = app_with(vec![]);
    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn get_city_by_id() -> anyhow::Result<()> {
    let app = app_with(vec![city(1, "Cidade 1", 1)]);
    let (status, body) = send(&app, "GET", "/city/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Cidade 1");
    assert_eq!(body["state_id"], 1);
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_rejected_before_lookup() -> anyhow::Result<()> {
    let app = app_with(vec![city(1, "Cidade 1", 1)]);
    for (method, uri) in [("GET", "/city/abc"), ("DELETE", "/city/1x"), ("PATCH", "/city/update/dois")] {
        let (status, body) = send(&app, method, uri, Some(json!({"name": "Cidade 2"}))).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body["message"], "FieldMustBeNumber");
    }
    assert_eq!(app.cities.lookups(), 0);
    Ok(())
}

#[tokio::test]
async fn missing_city_is_not_found() -> anyhow::Result<()> {
    let app = app_with(vec![]);
    let (status, body) = send(&app, "GET", "/city/99", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "cityNotFound");
    assert_eq!(body["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn create_city_returns_created_record() -> anyhow::Result<()> {
    let app = app_with(vec![]);
    let (status, body) = send(&app, "POST", "/city/create", Some(json!({"name": "Cidade 1", "state_id": 1}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Cidade 1");
    assert_eq!(body["state_id"], 1);
    assert!(body["deleted_at"].is_null());
    assert_eq!(app.cities.create_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn create_duplicate_is_client_error() -> anyhow::Result<()> {
    let app = app_with(vec![city(1, "Cidade 1", 1)]);
    let (status, body) = send(&app, "POST", "/city/create", Some(json!({"name": "Cidade 1", "state_id": 2}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "entityWithArgumentsExists");
    assert_eq!(app.cities.create_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn create_with_malformed_body_fails_validation() -> anyhow::Result<()> {
    let app = app_with(vec![]);
    for payload in [json!({"name": "Cidade 1"}), json!({"name": "Cidade 1", "state_id": "um"}), json!({"name": "", "state_id": 1})] {
        let (status, body) = send(&app, "POST", "/city/create", Some(payload)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "ValidationFailed");
    }
    assert_eq!(app.cities.create_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn create_with_unknown_state_is_not_found() -> anyhow::Result<()> {
    let app = app_with(vec![]);
    let (status, body) = send(&app, "POST", "/city/create", Some(json!({"name": "Cidade 1", "state_id": 9}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "stateNotFound");
    Ok(())
}

#[tokio::test]
async fn update_merges_fields() -> anyhow::Result<()> {
    let app = app_with(vec![city(1, "Cidade 1", 1)]);
    let (status, body) = send(&app, "PATCH", "/city/update/1", Some(json!({"name": "Cidade 2", "state_id": 2}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Cidade 2");
    assert_eq!(body["state_id"], 2);

    let (_, body) = send(&app, "PATCH", "/city/update/1", Some(json!({"state_id": 1}))).await?;
    assert_eq!(body["name"], "Cidade 2");
    assert_eq!(body["state_id"], 1);
    Ok(())
}

#[tokio::test]
async fn update_missing_city_is_not_found() -> anyhow::Result<()> {
    let app = app_with(vec![]);
    let (status, body) = send(&app, "PATCH", "/city/update/5", Some(json!({"name": "Cidade 2"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "cityNotFound");
    Ok(())
}

#[tokio::test]
async fn delete_returns_indicator_then_not_found() -> anyhow::Result<()> {
    let app = app_with(vec![city(1, "Cidade 1", 1)]);
    let (status, body) = send(&app, "DELETE", "/city/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cidade deletada com sucesso");

    let (status, body) = send(&app, "DELETE", "/city/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "cityNotFound");

    let (status, _) = send(&app, "GET", "/city/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn list_cities_and_states() -> anyhow::Result<()> {
    let app = app_with(vec![city(1, "Cidade 1", 1), city(2, "Cidade 2", 2), city(3, "Cidade 3", 2)]);
    let (status, body) = send(&app, "GET", "/city?page=2&per_page=2", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(|a| a.len()), Some(1));
    assert_eq!(body[0]["id"], 3);

    let (status, body) = send(&app, "GET", "/state", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["initials"], "SP");
    Ok(())
}

#[tokio::test]
async fn bulk_import_reports_counts() -> anyhow::Result<()> {
    let source = StaticMunicipalitySource::new(vec![
        Municipality::new(3550308, "São Paulo", "SP"),
        Municipality::new(3304557, "Rio de Janeiro", "RJ"),
        Municipality::new(3304557, "Rio de Janeiro", "RJ"),
        Municipality::new(1100015, "Alta Floresta D'Oeste", "RO"),
    ]);
    let app = build_app(vec![], source);
    let (status, body) = send(&app, "POST", "/city/createAllCities", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cidades salvas com sucesso");
    assert_eq!(body["fetched"], 4);
    assert_eq!(body["created"], 2);
    assert_eq!(body["duplicates"], 1);
    assert_eq!(body["unmatched"], 1);
    assert_eq!(body["failed"], 0);
    Ok(())
}

#[tokio::test]
async fn bulk_import_surfaces_source_failure() -> anyhow::Result<()> {
    let app = build_app(vec![], StaticMunicipalitySource::failing("connection refused"));
    let (status, body) = send(&app, "POST", "/city/createAllCities", None).await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "municipalitiesUnavailable");
    assert_eq!(app.cities.create_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let app = app_with(vec![]);
    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/city/{id}"].is_object());
    Ok(())
}

#[tokio::test]
async fn undecodable_id_is_rejected_as_json() -> anyhow::Result<()> {
    let app = app_with(vec![city(1, "Cidade 1", 1)]);
    for (method, uri) in [("GET", "/city/%FF"), ("DELETE", "/city/%FF"), ("PATCH", "/city/update/%C3%28")] {
        let (status, body) = send(&app, method, uri, Some(json!({"name": "Cidade 2"}))).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body["message"], "FieldMustBeNumber");
        assert_eq!(body["error"], "Bad Request");
    }
    assert_eq!(app.cities.lookups(), 0);
    Ok(())
}

#[tokio::test]
async fn malformed_pagination_query_fails_validation() -> anyhow::Result<()> {
    let app = app_with(vec![city(1, "Cidade 1", 1)]);
    for uri in ["/city?page=abc", "/city?per_page=-1"] {
        let (status, body) = send(&app, "GET", uri, None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], "ValidationFailed");
        assert!(body["detail"].is_string());
    }
    Ok(())
}
