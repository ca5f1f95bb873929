use chrono::Local;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::clients::{ClientList, ClientWithRentals, CreateClientRequest, UpdateClientRequest},
    entity::{
        clients::{ActiveModel as ClientActive, Column as ClientCol, Entity as Clients, Model as ClientModel},
        rentals::{Column as RentalCol, Entity as Rentals},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_manager, ensure_staff},
    models::{Client, Rental},
    response::ApiResponse,
    routes::params::ClientQuery,
    services::contains_pattern,
    state::AppState,
};

/// Case-insensitive match on name, phone or email.
pub fn client_search_condition(search: &str) -> Condition {
    let pattern = contains_pattern(search);
    Condition::any()
        .add(Expr::col(ClientCol::FullName).ilike(pattern.clone()))
        .add(Expr::col(ClientCol::Phone).ilike(pattern.clone()))
        .add(Expr::col(ClientCol::Email).ilike(pattern))
}

pub async fn list_clients(state: &AppState, query: ClientQuery) -> AppResult<ApiResponse<ClientList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = Clients::find();
    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        finder = finder.filter(client_search_condition(search));
    }
    let finder = finder.order_by_asc(ClientCol::FullName);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Client::from)
        .collect();

    Ok(ApiResponse::page("Clients", ClientList { items }, page, limit, total))
}

pub async fn find_client(state: &AppState, id: Uuid) -> AppResult<ClientModel> {
    Clients::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn get_client(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Client>> {
    let client = find_client(state, id).await?;
    Ok(ApiResponse::success("Client", Client::from(client), None))
}

pub async fn get_client_rentals(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<ClientWithRentals>> {
    let client = find_client(state, id).await?;
    let rentals = Rentals::find()
        .filter(RentalCol::ClientId.eq(id))
        .order_by_desc(RentalCol::StartDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Rental::from)
        .collect();

    Ok(ApiResponse::ok(
        "Client rentals",
        ClientWithRentals {
            client: Client::from(client),
            rentals,
        },
    ))
}

pub async fn create_client(
    state: &AppState,
    user: &AuthUser,
    payload: CreateClientRequest,
) -> AppResult<ApiResponse<Client>> {
    ensure_staff(user)?;
    payload.validate()?;

    let client = ClientActive {
        id: Set(Uuid::new_v4()),
        full_name: Set(payload.full_name.trim().to_string()),
        address: Set(payload.address.trim().to_string()),
        phone: Set(payload.phone.trim().to_string()),
        email: Set(payload.email.map(|e| e.trim().to_lowercase())),
        registration_date: Set(payload
            .registration_date
            .unwrap_or_else(|| Local::now().date_naive())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "client_create",
        "clients",
        serde_json::json!({ "client_id": client.id }),
    )
    .await;

    Ok(ApiResponse::ok("Client created", Client::from(client)))
}

pub async fn update_client(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateClientRequest,
) -> AppResult<ApiResponse<Client>> {
    ensure_staff(user)?;
    payload.validate()?;
    let existing = find_client(state, id).await?;

    let mut active: ClientActive = existing.into();
    if let Some(full_name) = payload.full_name {
        active.full_name = Set(full_name.trim().to_string());
    }
    if let Some(address) = payload.address {
        active.address = Set(address.trim().to_string());
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(phone.trim().to_string());
    }
    if let Some(email) = payload.email {
        active.email = Set(Some(email.trim().to_lowercase()));
    }
    let client = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "client_update",
        "clients",
        serde_json::json!({ "client_id": client.id }),
    )
    .await;

    Ok(ApiResponse::ok("Client updated", Client::from(client)))
}

pub async fn delete_client(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_manager(user)?;
    find_client(state, id).await?;

    let rentals = Rentals::find()
        .filter(RentalCol::ClientId.eq(id))
        .count(&state.orm)
        .await?;
    if rentals > 0 {
        return Err(AppError::Conflict("Client has rentals and cannot be deleted".into()));
    }

    Clients::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "client_delete",
        "clients",
        serde_json::json!({ "client_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}
