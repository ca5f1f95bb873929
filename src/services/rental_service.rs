use chrono::{Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit,
    dto::rentals::{
        CompleteRentalRequest, CreateRentalRequest, QuoteRequest, QuoteResponse, RentalDetail,
        RentalList, UpdateRentalRequest,
    },
    entity::{
        cars::{ActiveModel as CarActive, Entity as Cars, Model as CarModel},
        clients::Entity as Clients,
        penalties::{ActiveModel as PenaltyActive, Column as PenaltyCol, Entity as Penalties},
        rentals::{ActiveModel as RentalActive, Column as RentalCol, Entity as Rentals, Model as RentalModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_manager, ensure_staff},
    models::{Car, CarStatus, Client, Penalty, Rental, RentalStatus},
    pricing::{CostBreakdown, DateRange, calculate_total_cost, duration_days, is_date_range_valid, late_fee},
    response::ApiResponse,
    routes::params::{RentalQuery, SortOrder},
    state::AppState,
};

/// Active rentals of a car as date ranges, optionally ignoring one rental.
pub async fn booked_periods<C: ConnectionTrait>(
    conn: &C,
    car_id: Uuid,
    exclude: Option<Uuid>,
) -> AppResult<Vec<DateRange>> {
    let mut finder = Rentals::find()
        .filter(RentalCol::CarId.eq(car_id))
        .filter(RentalCol::Status.eq(RentalStatus::Active.as_str()));
    if let Some(exclude) = exclude {
        finder = finder.filter(RentalCol::Id.ne(exclude));
    }

    let periods = finder
        .order_by_asc(RentalCol::StartDate)
        .all(conn)
        .await?
        .into_iter()
        .map(|r| DateRange::new(r.start_date, r.expected_end_date))
        .collect();
    Ok(periods)
}

/// Ids of cars with an active rental touching `from..=to`.
pub async fn busy_car_ids<C: ConnectionTrait>(
    conn: &C,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<Uuid>> {
    let ids = Rentals::find()
        .select_only()
        .column(RentalCol::CarId)
        .distinct()
        .filter(RentalCol::Status.eq(RentalStatus::Active.as_str()))
        .filter(RentalCol::StartDate.lte(to))
        .filter(RentalCol::ExpectedEndDate.gte(from))
        .into_tuple::<Uuid>()
        .all(conn)
        .await?;
    Ok(ids)
}

/// Validate a booking request against a car and its booked periods and price it.
pub fn plan_rental(
    car: &CarModel,
    start: NaiveDate,
    end: NaiveDate,
    booked: &[DateRange],
) -> AppResult<CostBreakdown> {
    if start > end {
        return Err(AppError::BadRequest(
            "startDate must not be after expectedEndDate".into(),
        ));
    }
    if car.status == CarStatus::Maintenance.as_str() {
        return Err(AppError::Conflict("Car is under maintenance".into()));
    }
    if !is_date_range_valid(start, end, booked) {
        return Err(AppError::Conflict(
            "Car is already booked for the selected dates".into(),
        ));
    }
    Ok(calculate_total_cost(
        duration_days(start, end),
        car.price_per_day,
        car.deposit,
    ))
}

/// Recompute a car's status from its active rentals. Cars in maintenance are left alone.
pub async fn sync_car_status<C: ConnectionTrait>(conn: &C, car_id: Uuid) -> AppResult<()> {
    let car = match Cars::find_by_id(car_id).one(conn).await? {
        Some(c) => c,
        None => return Ok(()),
    };
    if car.status == CarStatus::Maintenance.as_str() {
        return Ok(());
    }

    let today = Local::now().date_naive();
    let ongoing = Rentals::find()
        .filter(RentalCol::CarId.eq(car_id))
        .filter(RentalCol::Status.eq(RentalStatus::Active.as_str()))
        .filter(RentalCol::StartDate.lte(today))
        .count(conn)
        .await?;
    let status = if ongoing > 0 {
        CarStatus::Rented
    } else {
        CarStatus::Available
    };

    if car.status != status.as_str() {
        let mut active: CarActive = car.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now().into());
        active.update(conn).await?;
    }
    Ok(())
}

/// Store the sum of a rental's penalties on the rental row.
pub async fn refresh_penalty_total<C: ConnectionTrait>(
    conn: &C,
    rental: RentalModel,
) -> AppResult<RentalModel> {
    let total: Decimal = Penalties::find()
        .filter(PenaltyCol::RentalId.eq(rental.id))
        .all(conn)
        .await?
        .iter()
        .map(|p| p.amount)
        .sum();

    if total == rental.penalty_amount {
        return Ok(rental);
    }
    let mut active: RentalActive = rental.into();
    active.penalty_amount = Set(total);
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(conn).await?)
}

fn ensure_transition(rental: &RentalModel, next: RentalStatus) -> AppResult<()> {
    let current: RentalStatus = rental
        .status
        .parse()
        .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))?;
    if !current.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "Cannot change rental status from {current} to {next}"
        )));
    }
    Ok(())
}

pub async fn quote_rental(
    state: &AppState,
    payload: QuoteRequest,
) -> AppResult<ApiResponse<QuoteResponse>> {
    if payload.start_date > payload.expected_end_date {
        return Err(AppError::BadRequest(
            "startDate must not be after expectedEndDate".into(),
        ));
    }
    let car = Cars::find_by_id(payload.car_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let booked = booked_periods(&state.orm, car.id, payload.exclude_rental_id).await?;

    let available = car.status != CarStatus::Maintenance.as_str()
        && is_date_range_valid(payload.start_date, payload.expected_end_date, &booked);
    let cost = calculate_total_cost(
        duration_days(payload.start_date, payload.expected_end_date),
        car.price_per_day,
        car.deposit,
    );

    Ok(ApiResponse::ok("Quote", QuoteResponse { available, cost }))
}

pub async fn list_rentals(state: &AppState, query: RentalQuery) -> AppResult<ApiResponse<RentalList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(RentalCol::Status.eq(status.as_str()));
    }
    if let Some(client_id) = query.client_id {
        condition = condition.add(RentalCol::ClientId.eq(client_id));
    }
    if let Some(car_id) = query.car_id {
        condition = condition.add(RentalCol::CarId.eq(car_id));
    }

    let mut finder = Rentals::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(RentalCol::StartDate),
        SortOrder::Desc => finder.order_by_desc(RentalCol::StartDate),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Rental::from)
        .collect();

    Ok(ApiResponse::page("Rentals", RentalList { items }, page, limit, total))
}

pub async fn get_rental(state: &AppState, id: Uuid) -> AppResult<ApiResponse<RentalDetail>> {
    let rental = Rentals::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let client = Clients::find_by_id(rental.client_id)
        .one(&state.orm)
        .await?
        .map(Client::from);
    let car = Cars::find_by_id(rental.car_id)
        .one(&state.orm)
        .await?
        .map(Car::from);
    let penalties = Penalties::find()
        .filter(PenaltyCol::RentalId.eq(rental.id))
        .order_by_asc(PenaltyCol::Date)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Penalty::from)
        .collect();

    Ok(ApiResponse::ok(
        "Rental",
        RentalDetail {
            rental: Rental::from(rental),
            client,
            car,
            penalties,
        },
    ))
}

pub async fn create_rental(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRentalRequest,
) -> AppResult<ApiResponse<Rental>> {
    ensure_staff(user)?;
    let txn = state.orm.begin().await?;

    Clients::find_by_id(payload.client_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("Client does not exist".into()))?;

    // Row lock on the car serialises concurrent bookings of the same car.
    let car = Cars::find_by_id(payload.car_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("Car does not exist".into()))?;

    let booked = booked_periods(&txn, car.id, None).await?;
    let cost = plan_rental(&car, payload.start_date, payload.expected_end_date, &booked)?;

    let rental = RentalActive {
        id: Set(Uuid::new_v4()),
        client_id: Set(payload.client_id),
        car_id: Set(car.id),
        start_date: Set(payload.start_date),
        expected_end_date: Set(payload.expected_end_date),
        actual_end_date: Set(None),
        deposit_amount: Set(cost.deposit),
        total_cost: Set(cost.total),
        penalty_amount: Set(Decimal::ZERO),
        status: Set(RentalStatus::Active.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    sync_car_status(&txn, car.id).await?;
    txn.commit().await?;

    tracing::info!(rental_id = %rental.id, car_id = %car.id, total = %cost.total, "rental created");
    audit::record(
        state,
        user.user_id,
        "rental_create",
        "rentals",
        serde_json::json!({ "rental_id": rental.id, "car_id": car.id, "client_id": rental.client_id }),
    )
    .await;

    Ok(ApiResponse::ok("Rental created", Rental::from(rental)))
}

pub async fn update_rental(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRentalRequest,
) -> AppResult<ApiResponse<Rental>> {
    ensure_staff(user)?;
    let txn = state.orm.begin().await?;

    let rental = Rentals::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if rental.status != RentalStatus::Active.as_str() {
        return Err(AppError::BadRequest("Only active rentals can be changed".into()));
    }

    let car = Cars::find_by_id(rental.car_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let start = payload.start_date.unwrap_or(rental.start_date);
    let end = payload.expected_end_date.unwrap_or(rental.expected_end_date);
    let booked = booked_periods(&txn, car.id, Some(rental.id)).await?;
    let cost = plan_rental(&car, start, end, &booked)?;

    let mut active: RentalActive = rental.into();
    active.start_date = Set(start);
    active.expected_end_date = Set(end);
    active.deposit_amount = Set(cost.deposit);
    active.total_cost = Set(cost.total);
    active.updated_at = Set(Utc::now().into());
    let rental = active.update(&txn).await?;

    sync_car_status(&txn, car.id).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "rental_update",
        "rentals",
        serde_json::json!({ "rental_id": rental.id, "start": start, "end": end }),
    )
    .await;

    Ok(ApiResponse::ok("Rental updated", Rental::from(rental)))
}

/// Return the car: close the rental and charge a late-return penalty when overdue.
pub async fn complete_rental(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: CompleteRentalRequest,
) -> AppResult<ApiResponse<Rental>> {
    ensure_staff(user)?;
    let txn = state.orm.begin().await?;

    let rental = Rentals::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_transition(&rental, RentalStatus::Completed)?;

    let actual_end = payload
        .actual_end_date
        .unwrap_or_else(|| Local::now().date_naive());
    if actual_end < rental.start_date {
        return Err(AppError::BadRequest(
            "actualEndDate must not be before startDate".into(),
        ));
    }

    let car = Cars::find_by_id(rental.car_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let fee = late_fee(rental.expected_end_date, actual_end, car.price_per_day);
    if fee > Decimal::ZERO {
        let overdue = (actual_end - rental.expected_end_date).num_days();
        PenaltyActive {
            id: Set(Uuid::new_v4()),
            rental_id: Set(rental.id),
            amount: Set(fee),
            reason: Set(format!("Late return ({overdue} days)")),
            date: Set(actual_end),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    let car_id = rental.car_id;
    let mut active: RentalActive = rental.into();
    active.status = Set(RentalStatus::Completed.as_str().to_string());
    active.actual_end_date = Set(Some(actual_end));
    active.updated_at = Set(Utc::now().into());
    let rental = active.update(&txn).await?;
    let rental = refresh_penalty_total(&txn, rental).await?;

    sync_car_status(&txn, car_id).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "rental_complete",
        "rentals",
        serde_json::json!({ "rental_id": rental.id, "late_fee": fee }),
    )
    .await;

    Ok(ApiResponse::ok("Rental completed", Rental::from(rental)))
}

pub async fn cancel_rental(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Rental>> {
    ensure_staff(user)?;
    let txn = state.orm.begin().await?;

    let rental = Rentals::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_transition(&rental, RentalStatus::Cancelled)?;

    let car_id = rental.car_id;
    let mut active: RentalActive = rental.into();
    active.status = Set(RentalStatus::Cancelled.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let rental = active.update(&txn).await?;

    sync_car_status(&txn, car_id).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "rental_cancel",
        "rentals",
        serde_json::json!({ "rental_id": rental.id }),
    )
    .await;

    Ok(ApiResponse::ok("Rental cancelled", Rental::from(rental)))
}

pub async fn delete_rental(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_manager(user)?;
    let txn = state.orm.begin().await?;

    let rental = Rentals::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let car_id = rental.car_id;

    Rentals::delete_by_id(id).exec(&txn).await?;
    sync_car_status(&txn, car_id).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "rental_delete",
        "rentals",
        serde_json::json!({ "rental_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}
