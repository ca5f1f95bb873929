use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::reports::{
        ClientReport, ClientReportRow, FleetReport, FleetReportRow, RentalReport, RentalReportRow,
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_manager},
    models::RentalStatus,
    pricing::occupancy_rate,
    response::ApiResponse,
    routes::params::PeriodQuery,
    state::AppState,
};

#[derive(FromRow)]
struct RentalRow {
    rental_id: Uuid,
    client_name: String,
    car: String,
    start_date: NaiveDate,
    expected_end_date: NaiveDate,
    actual_end_date: Option<NaiveDate>,
    status: String,
    total_cost: Decimal,
    deposit_amount: Decimal,
    penalty_amount: Decimal,
}

#[derive(FromRow)]
struct FleetRow {
    car_id: Uuid,
    car: String,
    status: String,
    rentals: i64,
    days_rented: i64,
    revenue: Decimal,
}

#[derive(FromRow)]
struct ClientRow {
    client_id: Uuid,
    full_name: String,
    rentals: i64,
    total_spent: Decimal,
    total_penalties: Decimal,
}

/// Number of calendar days in an inclusive window.
pub fn window_days(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days() + 1
}

/// Revenue and penalties of the billable rows; deposits are refundable and not revenue.
fn rental_totals(rows: &[RentalRow]) -> (Decimal, Decimal) {
    rows.iter()
        .filter(|r| r.status != RentalStatus::Cancelled.as_str())
        .fold((Decimal::ZERO, Decimal::ZERO), |(revenue, penalties), r| {
            (revenue + r.total_cost - r.deposit_amount, penalties + r.penalty_amount)
        })
}

pub async fn rentals_report(
    state: &AppState,
    user: &AuthUser,
    query: PeriodQuery,
) -> AppResult<ApiResponse<RentalReport>> {
    ensure_manager(user)?;
    let (from, to) = query.resolve();

    let rows = sqlx::query_as::<_, RentalRow>(
        r#"
        SELECT r.id AS rental_id,
               cl.full_name AS client_name,
               c.brand || ' ' || c.model AS car,
               r.start_date, r.expected_end_date, r.actual_end_date,
               r.status, r.total_cost, r.deposit_amount, r.penalty_amount
        FROM rentals r
        JOIN clients cl ON cl.id = r.client_id
        JOIN cars c ON c.id = r.car_id
        WHERE r.start_date BETWEEN $1 AND $2
        ORDER BY r.start_date, r.created_at
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(&state.pool)
    .await?;

    let (total_revenue, total_penalties) = rental_totals(&rows);

    let rows: Vec<RentalReportRow> = rows
        .into_iter()
        .map(|row| RentalReportRow {
            rental_id: row.rental_id,
            client_name: row.client_name,
            car: row.car,
            start_date: row.start_date,
            expected_end_date: row.expected_end_date,
            actual_end_date: row.actual_end_date,
            status: row.status,
            total_cost: row.total_cost,
            deposit_amount: row.deposit_amount,
            penalty_amount: row.penalty_amount,
        })
        .collect();

    let report = RentalReport {
        from,
        to,
        total_rentals: rows.len() as i64,
        rows,
        total_revenue,
        total_penalties,
    };
    Ok(ApiResponse::ok("Rentals report", report))
}

pub async fn fleet_report(
    state: &AppState,
    user: &AuthUser,
    query: PeriodQuery,
) -> AppResult<ApiResponse<FleetReport>> {
    ensure_manager(user)?;
    let (from, to) = query.resolve();

    // Days rented are clipped to the window; open rentals count up to their expected end.
    let rows = sqlx::query_as::<_, FleetRow>(
        r#"
        SELECT c.id AS car_id,
               c.brand || ' ' || c.model AS car,
               c.status,
               COUNT(r.id)::bigint AS rentals,
               COALESCE(SUM(
                   LEAST(COALESCE(r.actual_end_date, r.expected_end_date), $2)
                   - GREATEST(r.start_date, $1) + 1
               ), 0)::bigint AS days_rented,
               COALESCE(SUM(r.total_cost - r.deposit_amount), 0)::numeric AS revenue
        FROM cars c
        LEFT JOIN rentals r
               ON r.car_id = c.id
              AND r.status <> 'cancelled'
              AND r.start_date <= $2
              AND COALESCE(r.actual_end_date, r.expected_end_date) >= $1
        GROUP BY c.id, c.brand, c.model, c.status
        ORDER BY days_rented DESC, car
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(&state.pool)
    .await?;

    let days = window_days(from, to);
    let fleet_days: i64 = rows.iter().map(|r| r.days_rented).sum();
    let fleet_occupancy_rate = occupancy_rate(fleet_days, days * rows.len() as i64);

    let rows = rows
        .into_iter()
        .map(|row| FleetReportRow {
            occupancy_rate: occupancy_rate(row.days_rented, days),
            car_id: row.car_id,
            car: row.car,
            status: row.status,
            rentals: row.rentals,
            days_rented: row.days_rented,
            revenue: row.revenue,
        })
        .collect();

    Ok(ApiResponse::ok(
        "Fleet report",
        FleetReport {
            from,
            to,
            rows,
            fleet_occupancy_rate,
        },
    ))
}

pub async fn clients_report(
    state: &AppState,
    user: &AuthUser,
    query: PeriodQuery,
) -> AppResult<ApiResponse<ClientReport>> {
    ensure_manager(user)?;
    let (from, to) = query.resolve();

    let rows = sqlx::query_as::<_, ClientRow>(
        r#"
        SELECT cl.id AS client_id, cl.full_name,
               COUNT(r.id)::bigint AS rentals,
               COALESCE(SUM(r.total_cost - r.deposit_amount), 0)::numeric AS total_spent,
               COALESCE(SUM(r.penalty_amount), 0)::numeric AS total_penalties
        FROM clients cl
        JOIN rentals r
          ON r.client_id = cl.id
         AND r.status <> 'cancelled'
         AND r.start_date BETWEEN $1 AND $2
        GROUP BY cl.id, cl.full_name
        ORDER BY total_spent DESC, cl.full_name
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(&state.pool)
    .await?;

    let rows = rows
        .into_iter()
        .map(|row| ClientReportRow {
            client_id: row.client_id,
            full_name: row.full_name,
            rentals: row.rentals,
            total_spent: row.total_spent,
            total_penalties: row.total_penalties,
        })
        .collect();

    Ok(ApiResponse::ok("Clients report", ClientReport { from, to, rows }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, total: i64, deposit: i64, penalty: i64) -> RentalRow {
        RentalRow {
            rental_id: Uuid::new_v4(),
            client_name: "Client".into(),
            car: "Car".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 10).expect("date"),
            expected_end_date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("date"),
            actual_end_date: None,
            status: status.into(),
            total_cost: Decimal::from(total),
            deposit_amount: Decimal::from(deposit),
            penalty_amount: Decimal::from(penalty),
        }
    }

    #[test]
    fn totals_skip_deposits_and_cancelled_rentals() {
        let rows = [
            row("completed", 3800, 1300, 1000),
            row("active", 2650, 1150, 0),
            row("cancelled", 1500, 1000, 100),
        ];
        assert_eq!(
            rental_totals(&rows),
            (Decimal::from(4000), Decimal::from(1000))
        );
    }
}
