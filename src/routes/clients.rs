use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::clients::{ClientList, ClientWithRentals, CreateClientRequest, UpdateClientRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Client,
    response::ApiResponse,
    routes::params::ClientQuery,
    services::client_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/{id}", get(get_client).put(update_client).delete(delete_client))
        .route("/{id}/rentals", get(client_rentals))
}

#[utoipa::path(
    get,
    path = "/api/clients",
    params(ClientQuery),
    responses((status = 200, description = "List clients", body = ApiResponse<ClientList>)),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn list_clients(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ClientQuery>,
) -> AppResult<Json<ApiResponse<ClientList>>> {
    let resp = client_service::list_clients(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Get client", body = ApiResponse<Client>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn get_client(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Client>>> {
    let resp = client_service::get_client(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}/rentals",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client with rental history", body = ApiResponse<ClientWithRentals>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn client_rentals(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ClientWithRentals>>> {
    let resp = client_service::get_client_rentals(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = CreateClientRequest,
    responses(
        (status = 200, description = "Create client", body = ApiResponse<Client>),
        (status = 400, description = "Invalid payload")
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn create_client(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateClientRequest>,
) -> AppResult<Json<ApiResponse<Client>>> {
    let resp = client_service::create_client(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Updated client", body = ApiResponse<Client>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn update_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> AppResult<Json<ApiResponse<Client>>> {
    let resp = client_service::update_client(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Deleted client"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Client has rentals")
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn delete_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = client_service::delete_client(&state, &user, id).await?;
    Ok(Json(resp))
}
