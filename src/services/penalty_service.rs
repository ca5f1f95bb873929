use chrono::Local;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait, ActiveModelTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::penalties::{CreatePenaltyRequest, PenaltyList},
    entity::{
        penalties::{ActiveModel as PenaltyActive, Column as PenaltyCol, Entity as Penalties},
        rentals::Entity as Rentals,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_manager, ensure_staff},
    models::{Penalty, RentalStatus},
    response::ApiResponse,
    routes::params::PenaltyQuery,
    services::rental_service::refresh_penalty_total,
    state::AppState,
};

/// Penalty amounts must be positive and no larger than `max`.
pub fn validate_penalty_amount(amount: Decimal, max: Decimal) -> AppResult<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("Penalty amount must be positive".into()));
    }
    if amount > max {
        return Err(AppError::BadRequest(format!(
            "Penalty amount must not exceed {max}"
        )));
    }
    Ok(())
}

pub async fn list_penalties(
    state: &AppState,
    query: PenaltyQuery,
) -> AppResult<ApiResponse<PenaltyList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = Penalties::find();
    if let Some(rental_id) = query.rental_id {
        finder = finder.filter(PenaltyCol::RentalId.eq(rental_id));
    }
    let finder = finder
        .order_by_desc(PenaltyCol::Date)
        .order_by_desc(PenaltyCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Penalty::from)
        .collect();

    Ok(ApiResponse::page("Penalties", PenaltyList { items }, page, limit, total))
}

pub async fn get_penalty(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Penalty>> {
    let penalty = Penalties::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Penalty", Penalty::from(penalty), None))
}

pub async fn create_penalty(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePenaltyRequest,
) -> AppResult<ApiResponse<Penalty>> {
    ensure_staff(user)?;
    payload.validate()?;
    validate_penalty_amount(payload.amount, state.config.penalty_max_amount)?;

    let txn = state.orm.begin().await?;
    let rental = Rentals::find_by_id(payload.rental_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("Rental does not exist".into()))?;
    if rental.status == RentalStatus::Cancelled.as_str() {
        return Err(AppError::BadRequest("Cannot add a penalty to a cancelled rental".into()));
    }

    let penalty = PenaltyActive {
        id: Set(Uuid::new_v4()),
        rental_id: Set(rental.id),
        amount: Set(payload.amount),
        reason: Set(payload.reason.trim().to_string()),
        date: Set(payload.date.unwrap_or_else(|| Local::now().date_naive())),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    refresh_penalty_total(&txn, rental).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "penalty_create",
        "penalties",
        serde_json::json!({ "penalty_id": penalty.id, "rental_id": penalty.rental_id }),
    )
    .await;

    Ok(ApiResponse::ok("Penalty created", Penalty::from(penalty)))
}

pub async fn delete_penalty(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_manager(user)?;
    let txn = state.orm.begin().await?;

    let penalty = Penalties::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let rental = Rentals::find_by_id(penalty.rental_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    Penalties::delete_by_id(id).exec(&txn).await?;
    refresh_penalty_total(&txn, rental).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "penalty_delete",
        "penalties",
        serde_json::json!({ "penalty_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}
