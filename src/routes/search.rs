use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::{cars::CarList, clients::ClientList, search::GlobalSearchResult},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::{CarQuery, ClientQuery, SearchQuery},
    services::search_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(global_search))
        .route("/cars", get(search_cars))
        .route("/clients", get(search_clients))
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchQuery),
    responses((status = 200, description = "Cars and clients matching a term", body = ApiResponse<GlobalSearchResult>)),
    security(("bearer_auth" = [])),
    tag = "Search"
)]
pub async fn global_search(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<GlobalSearchResult>>> {
    let resp = search_service::global_search(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/search/cars",
    params(CarQuery),
    responses((status = 200, description = "Filter cars, optionally by availability window", body = ApiResponse<CarList>)),
    security(("bearer_auth" = [])),
    tag = "Search"
)]
pub async fn search_cars(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<CarQuery>,
) -> AppResult<Json<ApiResponse<CarList>>> {
    let resp = search_service::search_cars(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/search/clients",
    params(ClientQuery),
    responses((status = 200, description = "Search clients", body = ApiResponse<ClientList>)),
    security(("bearer_auth" = [])),
    tag = "Search"
)]
pub async fn search_clients(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ClientQuery>,
) -> AppResult<Json<ApiResponse<ClientList>>> {
    let resp = search_service::search_clients(&state, query).await?;
    Ok(Json(resp))
}
