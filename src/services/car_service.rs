use chrono::{Local, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::cars::{BookedPeriods, CarList, CreateCarRequest, UpdateCarRequest, UpdateCarStatusRequest},
    entity::{
        cars::{ActiveModel as CarActive, Column as CarCol, Entity as Cars, Model as CarModel},
        rentals::{Column as RentalCol, Entity as Rentals},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_manager, ensure_staff},
    models::{Car, CarStatus, CarType, RentalStatus, encode_image_urls, parse_image_urls},
    response::ApiResponse,
    routes::params::{CarQuery, CarSortBy, SortOrder},
    services::{
        contains_pattern,
        rental_service::{booked_periods, busy_car_ids},
    },
    state::AppState,
};

pub async fn list_cars(state: &AppState, query: CarQuery) -> AppResult<ApiResponse<CarList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(CarCol::Brand).ilike(pattern.clone()))
                .add(Expr::col(CarCol::Model).ilike(pattern.clone()))
                .add(Expr::col(CarCol::Color).ilike(pattern)),
        );
    }
    if let Some(car_type) = query.car_type {
        condition = condition.add(CarCol::CarType.eq(car_type.as_str()));
    }
    if let Some(status) = query.status {
        condition = condition.add(CarCol::Status.eq(status.as_str()));
    }
    if let Some(min_price) = query.min_price {
        condition = condition.add(CarCol::PricePerDay.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        condition = condition.add(CarCol::PricePerDay.lte(max_price));
    }
    if let (Some(from), Some(to)) = (query.available_from, query.available_to) {
        if from > to {
            return Err(AppError::BadRequest("availableFrom must not be after availableTo".into()));
        }
        let busy = busy_car_ids(&state.orm, from, to).await?;
        if !busy.is_empty() {
            condition = condition.add(CarCol::Id.is_not_in(busy));
        }
        condition = condition.add(CarCol::Status.ne(CarStatus::Maintenance.as_str()));
    }

    let sort_col = match query.sort_by.unwrap_or(CarSortBy::CreatedAt) {
        CarSortBy::CreatedAt => CarCol::CreatedAt,
        CarSortBy::PricePerDay => CarCol::PricePerDay,
        CarSortBy::Year => CarCol::Year,
        CarSortBy::Brand => CarCol::Brand,
    };
    let mut finder = Cars::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Car::from)
        .collect();

    Ok(ApiResponse::page("Cars", CarList { items }, page, limit, total))
}

pub async fn find_car(state: &AppState, id: Uuid) -> AppResult<CarModel> {
    Cars::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn get_car(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Car>> {
    let car = find_car(state, id).await?;
    Ok(ApiResponse::success("Car", Car::from(car), None))
}

fn ensure_money(value: Decimal, field: &str) -> AppResult<()> {
    if value.is_sign_negative() {
        return Err(AppError::BadRequest(format!("{field} must not be negative")));
    }
    Ok(())
}

pub async fn create_car(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCarRequest,
) -> AppResult<ApiResponse<Car>> {
    ensure_staff(user)?;
    payload.validate()?;
    ensure_money(payload.price_per_day, "pricePerDay")?;
    let deposit = payload.deposit.unwrap_or(Decimal::ZERO);
    ensure_money(deposit, "deposit")?;

    let image_urls = payload.image_urls.unwrap_or_default();
    let image_url = payload.image_url.or_else(|| image_urls.first().cloned());

    let car = CarActive {
        id: Set(Uuid::new_v4()),
        brand: Set(payload.brand.trim().to_string()),
        model: Set(payload.model.trim().to_string()),
        year: Set(payload.year),
        car_type: Set(payload.car_type.unwrap_or(CarType::Economy).as_str().to_string()),
        price_per_day: Set(payload.price_per_day),
        deposit: Set(deposit),
        status: Set(payload.status.unwrap_or(CarStatus::Available).as_str().to_string()),
        body_type: Set(payload.body_type),
        drive_type: Set(payload.drive_type),
        transmission: Set(payload.transmission),
        engine: Set(payload.engine),
        fuel_type: Set(payload.fuel_type),
        seats: Set(payload.seats),
        mileage: Set(payload.mileage),
        color: Set(payload.color),
        features: Set(payload.features),
        image_url: Set(image_url),
        image_urls: Set(Some(encode_image_urls(&image_urls))),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "car_create",
        "cars",
        serde_json::json!({ "car_id": car.id }),
    )
    .await;

    Ok(ApiResponse::ok("Car created", Car::from(car)))
}

pub async fn update_car(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCarRequest,
) -> AppResult<ApiResponse<Car>> {
    ensure_staff(user)?;
    payload.validate()?;
    let txn = state.orm.begin().await?;
    // Same row lock as booking, so a status change cannot interleave with a new rental.
    let existing = Cars::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CarActive = existing.into();
    if let Some(brand) = payload.brand {
        active.brand = Set(brand.trim().to_string());
    }
    if let Some(model) = payload.model {
        active.model = Set(model.trim().to_string());
    }
    if let Some(year) = payload.year {
        active.year = Set(year);
    }
    if let Some(car_type) = payload.car_type {
        active.car_type = Set(car_type.as_str().to_string());
    }
    if let Some(price) = payload.price_per_day {
        ensure_money(price, "pricePerDay")?;
        active.price_per_day = Set(price);
    }
    if let Some(deposit) = payload.deposit {
        ensure_money(deposit, "deposit")?;
        active.deposit = Set(deposit);
    }
    if let Some(status) = payload.status {
        ensure_status_change_allowed(&txn, id, status).await?;
        active.status = Set(status.as_str().to_string());
    }
    if payload.body_type.is_some() {
        active.body_type = Set(payload.body_type);
    }
    if payload.drive_type.is_some() {
        active.drive_type = Set(payload.drive_type);
    }
    if payload.transmission.is_some() {
        active.transmission = Set(payload.transmission);
    }
    if payload.engine.is_some() {
        active.engine = Set(payload.engine);
    }
    if payload.fuel_type.is_some() {
        active.fuel_type = Set(payload.fuel_type);
    }
    if payload.seats.is_some() {
        active.seats = Set(payload.seats);
    }
    if payload.mileage.is_some() {
        active.mileage = Set(payload.mileage);
    }
    if payload.color.is_some() {
        active.color = Set(payload.color);
    }
    if payload.features.is_some() {
        active.features = Set(payload.features);
    }
    if payload.image_url.is_some() {
        active.image_url = Set(payload.image_url);
    }
    if let Some(urls) = payload.image_urls {
        active.image_urls = Set(Some(encode_image_urls(&urls)));
    }
    active.updated_at = Set(Utc::now().into());
    let car = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "car_update",
        "cars",
        serde_json::json!({ "car_id": car.id }),
    )
    .await;

    Ok(ApiResponse::ok("Car updated", Car::from(car)))
}

/// A car that is on the road right now cannot be marked available or sent to maintenance.
async fn ensure_status_change_allowed<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    status: CarStatus,
) -> AppResult<()> {
    if status == CarStatus::Rented {
        return Ok(());
    }
    let today = Local::now().date_naive();
    let ongoing = Rentals::find()
        .filter(RentalCol::CarId.eq(id))
        .filter(RentalCol::Status.eq(RentalStatus::Active.as_str()))
        .filter(RentalCol::StartDate.lte(today))
        .count(conn)
        .await?;
    if ongoing > 0 {
        return Err(AppError::Conflict(
            "Car has an ongoing rental; complete or cancel it first".into(),
        ));
    }
    Ok(())
}

pub async fn update_car_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCarStatusRequest,
) -> AppResult<ApiResponse<Car>> {
    ensure_staff(user)?;
    let txn = state.orm.begin().await?;
    let existing = Cars::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_status_change_allowed(&txn, id, payload.status).await?;

    let mut active: CarActive = existing.into();
    active.status = Set(payload.status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let car = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "car_status_update",
        "cars",
        serde_json::json!({ "car_id": car.id, "status": car.status }),
    )
    .await;

    Ok(ApiResponse::ok("Car status updated", Car::from(car)))
}

pub async fn delete_car(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_manager(user)?;
    find_car(state, id).await?;

    let rentals = Rentals::find()
        .filter(RentalCol::CarId.eq(id))
        .count(&state.orm)
        .await?;
    if rentals > 0 {
        return Err(AppError::Conflict("Car has rentals and cannot be deleted".into()));
    }

    Cars::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "car_delete",
        "cars",
        serde_json::json!({ "car_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}

pub async fn get_booked_periods(state: &AppState, id: Uuid) -> AppResult<ApiResponse<BookedPeriods>> {
    find_car(state, id).await?;
    let periods = booked_periods(&state.orm, id, None).await?;
    Ok(ApiResponse::ok(
        "Booked periods",
        BookedPeriods { car_id: id, periods },
    ))
}

/// Append uploaded image URLs to a car's stored list.
pub async fn attach_images(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    urls: Vec<String>,
) -> AppResult<Car> {
    ensure_staff(user)?;
    let model = find_car(state, id).await?;
    let existing = Car::from(model.clone());

    let mut images = parse_image_urls(&existing);
    images.extend(urls);
    let primary = existing.image_url.clone().or_else(|| images.first().cloned());

    let mut active: CarActive = model.into();
    active.image_urls = Set(Some(encode_image_urls(&images)));
    active.image_url = Set(primary);
    active.updated_at = Set(Utc::now().into());
    let car = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "car_images_attach",
        "cars",
        serde_json::json!({ "car_id": car.id, "images": images.len() }),
    )
    .await;

    Ok(Car::from(car))
}
