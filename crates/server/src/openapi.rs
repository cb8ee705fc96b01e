use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct CityDoc {
    pub id: i32,
    pub name: String,
    pub state_id: i32,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(ToSchema)]
pub struct StateDoc {
    pub id: i32,
    pub name: String,
    pub initials: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct CreateCityInputDoc { pub name: String, pub state_id: i32 }

#[derive(ToSchema)]
pub struct UpdateCityInputDoc { pub name: Option<String>, pub state_id: Option<i32> }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct ImportOutputDoc {
    pub message: String,
    pub fetched: usize,
    pub created: usize,
    pub duplicates: usize,
    pub unmatched: usize,
    pub failed: usize,
}

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String, pub message: String, pub detail: Option<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::cities::get,
        crate::cities::list,
        crate::cities::create,
        crate::cities::update,
        crate::cities::delete,
        crate::cities::create_all,
        crate::cities::list_states,
    ),
    components(
        schemas(
            HealthResponse,
            CityDoc,
            StateDoc,
            CreateCityInputDoc,
            UpdateCityInputDoc,
            MessageDoc,
            ImportOutputDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "cities"),
        (name = "states")
    )
)]
pub struct ApiDoc;
