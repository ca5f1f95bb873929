use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::analytics::{
        AnalyticsSummary, FleetStatusCounts, PopularCar, PopularCarList, RevenuePoint, RevenueSeries,
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_manager},
    pricing::occupancy_rate,
    response::ApiResponse,
    routes::params::{PeriodQuery, PopularCarsQuery},
    state::AppState,
};

#[derive(FromRow)]
struct FleetRow {
    total: i64,
    available: i64,
    rented: i64,
    maintenance: i64,
}

#[derive(FromRow)]
struct RentalCountsRow {
    active: i64,
    completed: i64,
    cancelled: i64,
    rental_revenue: Decimal,
}

#[derive(FromRow)]
struct RevenueRow {
    period: String,
    rentals: i64,
    rental_revenue: Decimal,
    penalty_revenue: Decimal,
}

#[derive(FromRow)]
struct PopularCarRow {
    car_id: Uuid,
    brand: String,
    model: String,
    rentals: i64,
    revenue: Decimal,
}

pub async fn summary(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<AnalyticsSummary>> {
    ensure_manager(user)?;

    let fleet = sqlx::query_as::<_, FleetRow>(
        r#"
        SELECT COUNT(*)::bigint AS total,
               COUNT(*) FILTER (WHERE status = 'available')::bigint AS available,
               COUNT(*) FILTER (WHERE status = 'rented')::bigint AS rented,
               COUNT(*) FILTER (WHERE status = 'maintenance')::bigint AS maintenance
        FROM cars
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    // Revenue excludes the refundable deposit.
    let rentals = sqlx::query_as::<_, RentalCountsRow>(
        r#"
        SELECT COUNT(*) FILTER (WHERE status = 'active')::bigint AS active,
               COUNT(*) FILTER (WHERE status = 'completed')::bigint AS completed,
               COUNT(*) FILTER (WHERE status = 'cancelled')::bigint AS cancelled,
               COALESCE(SUM(total_cost - deposit_amount) FILTER (WHERE status <> 'cancelled'), 0)::numeric
                   AS rental_revenue
        FROM rentals
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    let penalty_revenue: (Decimal,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(p.amount), 0)::numeric
        FROM penalties p
        JOIN rentals r ON r.id = p.rental_id
        WHERE r.status <> 'cancelled'
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    let total_clients: (i64,) = sqlx::query_as("SELECT COUNT(*)::bigint FROM clients")
        .fetch_one(&state.pool)
        .await?;

    let data = AnalyticsSummary {
        occupancy_rate: occupancy_rate(fleet.rented, fleet.total),
        fleet: FleetStatusCounts {
            total: fleet.total,
            available: fleet.available,
            rented: fleet.rented,
            maintenance: fleet.maintenance,
        },
        active_rentals: rentals.active,
        completed_rentals: rentals.completed,
        cancelled_rentals: rentals.cancelled,
        total_clients: total_clients.0,
        rental_revenue: rentals.rental_revenue,
        penalty_revenue: penalty_revenue.0,
        total_revenue: rentals.rental_revenue + penalty_revenue.0,
    };

    Ok(ApiResponse::ok("Analytics summary", data))
}

pub async fn revenue(
    state: &AppState,
    user: &AuthUser,
    query: PeriodQuery,
) -> AppResult<ApiResponse<RevenueSeries>> {
    ensure_manager(user)?;
    let (from, to): (NaiveDate, NaiveDate) = query.resolve();

    let rows = sqlx::query_as::<_, RevenueRow>(
        r#"
        SELECT to_char(date_trunc('month', start_date), 'YYYY-MM') AS period,
               COUNT(*)::bigint AS rentals,
               COALESCE(SUM(total_cost - deposit_amount), 0)::numeric AS rental_revenue,
               COALESCE(SUM(penalty_amount), 0)::numeric AS penalty_revenue
        FROM rentals
        WHERE status <> 'cancelled'
          AND start_date BETWEEN $1 AND $2
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(&state.pool)
    .await?;

    let points = rows
        .into_iter()
        .map(|row| RevenuePoint {
            period: row.period,
            rentals: row.rentals,
            rental_revenue: row.rental_revenue,
            penalty_revenue: row.penalty_revenue,
        })
        .collect();

    Ok(ApiResponse::ok("Revenue", RevenueSeries { points }))
}

pub async fn popular_cars(
    state: &AppState,
    user: &AuthUser,
    query: PopularCarsQuery,
) -> AppResult<ApiResponse<PopularCarList>> {
    ensure_manager(user)?;
    let limit = query.limit.unwrap_or(5).clamp(1, 50);

    let rows = sqlx::query_as::<_, PopularCarRow>(
        r#"
        SELECT c.id AS car_id, c.brand, c.model,
               COUNT(r.id)::bigint AS rentals,
               COALESCE(SUM(r.total_cost - r.deposit_amount), 0)::numeric AS revenue
        FROM cars c
        JOIN rentals r ON r.car_id = c.id AND r.status <> 'cancelled'
        GROUP BY c.id, c.brand, c.model
        ORDER BY rentals DESC, revenue DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(&state.pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|row| PopularCar {
            car_id: row.car_id,
            brand: row.brand,
            model: row.model,
            rentals: row.rentals,
            revenue: row.revenue,
        })
        .collect();

    Ok(ApiResponse::ok("Popular cars", PopularCarList { items }))
}
