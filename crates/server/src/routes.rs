use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::city::{source::MunicipalitySource, CityService};

use crate::{cities, openapi::ApiDoc};

/// Shared handler state, wired explicitly at startup.
#[derive(Clone)]
pub struct AppState {
    pub cities: Arc<CityService>,
    pub municipalities: Arc<dyn MunicipalitySource>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: city/state endpoints, health, and OpenAPI docs.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let city_routes = Router::new()
        .route("/city", get(cities::list))
        .route("/city/create", post(cities::create))
        .route("/city/createAllCities", post(cities::create_all))
        .route("/city/update/:id", patch(cities::update))
        .route("/city/:id", get(cities::get).delete(cities::delete))
        .route("/state", get(cities::list_states));

    Router::new()
        .route("/health", get(health))
        .merge(city_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
