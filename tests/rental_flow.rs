use car_rental_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        auth::LoginRequest,
        cars::{CreateCarRequest, UpdateCarStatusRequest},
        clients::CreateClientRequest,
        penalties::CreatePenaltyRequest,
        rentals::{CompleteRentalRequest, CreateRentalRequest, QuoteRequest, UpdateRentalRequest},
        users::UpdateUserRequest,
    },
    entity::{
        cars::Entity as Cars,
        penalties::{Column as PenaltyCol, Entity as Penalties},
        users::ActiveModel as UserActive,
    },
    error::AppError,
    middleware::auth::{AuthUser, authenticate, ensure_staff},
    models::{CarStatus, CarType, RentalStatus, Role},
    routes::params::{ClientQuery, PeriodQuery},
    services::{
        analytics_service, auth_service, auth_service::hash_password, car_service, client_service,
        penalty_service, rental_service, report_service, user_service,
    },
    state::AppState,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    Statement,
};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

// Integration flow: book a car, reject an overlapping booking, return it late and read the summary.
#[tokio::test]
async fn booking_overlap_late_return_and_summary_flow() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let employee = create_user(&state, "employee", Role::Employee).await?;
    let manager = create_user(&state, "manager", Role::Manager).await?;

    let car = car_service::create_car(
        &state,
        &employee,
        CreateCarRequest {
            brand: "Skoda".into(),
            model: "Octavia".into(),
            year: 2021,
            car_type: Some(CarType::Business),
            price_per_day: Decimal::from(500),
            deposit: Some(Decimal::from(1000)),
            status: None,
            body_type: None,
            drive_type: None,
            transmission: Some("automatic".into()),
            engine: None,
            fuel_type: None,
            seats: Some(5),
            mileage: None,
            color: None,
            features: None,
            image_url: None,
            image_urls: None,
        },
    )
    .await?
    .data
    .expect("car");
    assert_eq!(car.status, CarStatus::Available);

    let client = client_service::create_client(
        &state,
        &employee,
        CreateClientRequest {
            full_name: "Ivan Petrov".into(),
            address: "12 Lenina St".into(),
            phone: "+7 900 111-22-33".into(),
            email: None,
            registration_date: None,
        },
    )
    .await?
    .data
    .expect("client");

    // Jan 10..=15 is five billable days: 2500 price plus 1000 + 0.15*500*4 deposit.
    let rental = rental_service::create_rental(
        &state,
        &employee,
        CreateRentalRequest {
            client_id: client.id,
            car_id: car.id,
            start_date: date(2024, 1, 10),
            expected_end_date: date(2024, 1, 15),
        },
    )
    .await?
    .data
    .expect("rental");
    assert_eq!(rental.status, RentalStatus::Active);
    assert_eq!(rental.deposit_amount, Decimal::from(1300));
    assert_eq!(rental.total_cost, Decimal::from(3800));

    let rented = Cars::find_by_id(car.id).one(&state.orm).await?.expect("car row");
    assert_eq!(rented.status, CarStatus::Rented.as_str());

    let to_maintenance = car_service::update_car_status(
        &state,
        &employee,
        car.id,
        UpdateCarStatusRequest {
            status: CarStatus::Maintenance,
        },
    )
    .await;
    assert!(matches!(to_maintenance, Err(AppError::Conflict(_))));
    let still_rented = Cars::find_by_id(car.id).one(&state.orm).await?.expect("car row");
    assert_eq!(still_rented.status, CarStatus::Rented.as_str());

    let overlapping = rental_service::create_rental(
        &state,
        &employee,
        CreateRentalRequest {
            client_id: client.id,
            car_id: car.id,
            start_date: date(2024, 1, 15),
            expected_end_date: date(2024, 1, 18),
        },
    )
    .await;
    assert!(matches!(overlapping, Err(AppError::Conflict(_))));

    let quote = rental_service::quote_rental(
        &state,
        QuoteRequest {
            car_id: car.id,
            start_date: date(2024, 1, 16),
            expected_end_date: date(2024, 1, 19),
            exclude_rental_id: None,
        },
    )
    .await?
    .data
    .expect("quote");
    assert!(quote.available);
    assert_eq!(quote.cost.total, Decimal::from(2650));

    // Two days late at 500/day.
    let completed = rental_service::complete_rental(
        &state,
        &employee,
        rental.id,
        CompleteRentalRequest {
            actual_end_date: Some(date(2024, 1, 17)),
        },
    )
    .await?
    .data
    .expect("completed rental");
    assert_eq!(completed.status, RentalStatus::Completed);
    assert_eq!(completed.actual_end_date, Some(date(2024, 1, 17)));
    assert_eq!(completed.penalty_amount, Decimal::from(1000));

    let released = Cars::find_by_id(car.id).one(&state.orm).await?.expect("car row");
    assert_eq!(released.status, CarStatus::Available.as_str());

    let cancel_again = rental_service::cancel_rental(&state, &employee, rental.id).await;
    assert!(matches!(cancel_again, Err(AppError::BadRequest(_))));

    penalty_service::create_penalty(
        &state,
        &employee,
        CreatePenaltyRequest {
            rental_id: rental.id,
            amount: Decimal::from(250),
            reason: "Scratched bumper".into(),
            date: Some(date(2024, 1, 17)),
        },
    )
    .await?;

    let detail = rental_service::get_rental(&state, rental.id)
        .await?
        .data
        .expect("rental detail");
    assert_eq!(detail.penalties.len(), 2);
    assert_eq!(detail.rental.penalty_amount, Decimal::from(1250));

    let forbidden = analytics_service::summary(&state, &employee).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    let summary = analytics_service::summary(&state, &manager)
        .await?
        .data
        .expect("summary");
    assert_eq!(summary.fleet.total, 1);
    assert_eq!(summary.fleet.available, 1);
    assert_eq!(summary.completed_rentals, 1);
    assert_eq!(summary.total_clients, 1);
    assert_eq!(summary.rental_revenue, Decimal::from(2500));
    assert_eq!(summary.penalty_revenue, Decimal::from(1250));
    assert_eq!(summary.total_revenue, Decimal::from(3750));

    // A penalty on a rental that is later cancelled is not revenue.
    let cancelled = rental_service::create_rental(
        &state,
        &employee,
        CreateRentalRequest {
            client_id: client.id,
            car_id: car.id,
            start_date: date(2024, 2, 1),
            expected_end_date: date(2024, 2, 3),
        },
    )
    .await?
    .data
    .expect("rental");
    penalty_service::create_penalty(
        &state,
        &employee,
        CreatePenaltyRequest {
            rental_id: cancelled.id,
            amount: Decimal::from(100),
            reason: "Dirty interior".into(),
            date: Some(date(2024, 2, 1)),
        },
    )
    .await?;
    rental_service::cancel_rental(&state, &employee, cancelled.id).await?;

    let summary = analytics_service::summary(&state, &manager)
        .await?
        .data
        .expect("summary");
    assert_eq!(summary.cancelled_rentals, 1);
    assert_eq!(summary.fleet.available, 1);
    assert_eq!(summary.penalty_revenue, Decimal::from(1250));
    assert_eq!(summary.total_revenue, Decimal::from(3750));

    let report = report_service::rentals_report(
        &state,
        &manager,
        PeriodQuery {
            from: Some(date(2024, 1, 1)),
            to: Some(date(2024, 12, 31)),
        },
    )
    .await?
    .data
    .expect("rentals report");
    assert_eq!(report.total_rentals, 2);
    assert_eq!(report.total_revenue, Decimal::from(2500));
    assert_eq!(report.total_penalties, Decimal::from(1250));

    // Wildcards in a search term match literally.
    let underscore = client_service::list_clients(
        &state,
        ClientQuery {
            q: Some("_".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("clients");
    assert!(underscore.items.is_empty());
    let by_name = client_service::list_clients(
        &state,
        ClientQuery {
            q: Some("petrov".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("clients");
    assert_eq!(by_name.items.len(), 1);

    // These share the database with the flow above, so they run in the same test.
    booked_car_and_client_cannot_be_deleted(&state).await?;
    rental_update_and_delete(&state).await?;
    stale_tokens_follow_account_changes(&state).await?;

    Ok(())
}

async fn booked_car_and_client_cannot_be_deleted(state: &AppState) -> anyhow::Result<()> {
    let manager = create_user(state, "fleet-manager", Role::Manager).await?;

    let car = car_service::create_car(
        state,
        &manager,
        CreateCarRequest {
            brand: "Kia".into(),
            model: "Rio".into(),
            year: 2022,
            car_type: None,
            price_per_day: Decimal::from(300),
            deposit: None,
            status: None,
            body_type: None,
            drive_type: None,
            transmission: None,
            engine: None,
            fuel_type: None,
            seats: None,
            mileage: None,
            color: None,
            features: None,
            image_url: None,
            image_urls: Some(vec!["/uploads/rio.jpg".into()]),
        },
    )
    .await?
    .data
    .expect("car");
    assert_eq!(car.image_url.as_deref(), Some("/uploads/rio.jpg"));

    let client = client_service::create_client(
        state,
        &manager,
        CreateClientRequest {
            full_name: "Anna Smirnova".into(),
            address: "5 Nevsky Ave".into(),
            phone: "+7 900 444-55-66".into(),
            email: Some("anna@example.com".into()),
            registration_date: None,
        },
    )
    .await?
    .data
    .expect("client");

    rental_service::create_rental(
        state,
        &manager,
        CreateRentalRequest {
            client_id: client.id,
            car_id: car.id,
            start_date: date(2030, 5, 1),
            expected_end_date: date(2030, 5, 3),
        },
    )
    .await?;

    // Future booking: the car stays available today.
    let row = Cars::find_by_id(car.id).one(&state.orm).await?.expect("car row");
    assert_eq!(row.status, CarStatus::Available.as_str());

    let deleted = car_service::delete_car(state, &manager, car.id).await;
    assert!(matches!(deleted, Err(AppError::Conflict(_))));

    let deleted_client = client_service::delete_client(state, &manager, client.id).await;
    assert!(matches!(deleted_client, Err(AppError::Conflict(_))));

    Ok(())
}

async fn rental_update_and_delete(state: &AppState) -> anyhow::Result<()> {
    let employee = create_user(state, "desk-clerk", Role::Employee).await?;
    let manager = create_user(state, "branch-manager", Role::Manager).await?;

    let car = car_service::create_car(
        state,
        &employee,
        CreateCarRequest {
            brand: "Toyota".into(),
            model: "Camry".into(),
            year: 2023,
            car_type: Some(CarType::Business),
            price_per_day: Decimal::from(400),
            deposit: Some(Decimal::from(500)),
            status: None,
            body_type: None,
            drive_type: None,
            transmission: None,
            engine: None,
            fuel_type: None,
            seats: None,
            mileage: None,
            color: None,
            features: None,
            image_url: None,
            image_urls: None,
        },
    )
    .await?
    .data
    .expect("car");

    let client = client_service::create_client(
        state,
        &employee,
        CreateClientRequest {
            full_name: "Oleg Sidorov".into(),
            address: "8 Mira St".into(),
            phone: "+7 900 777-88-99".into(),
            email: None,
            registration_date: None,
        },
    )
    .await?
    .data
    .expect("client");

    let book = |start: NaiveDate, end: NaiveDate| CreateRentalRequest {
        client_id: client.id,
        car_id: car.id,
        start_date: start,
        expected_end_date: end,
    };

    // Four days: 1600 price, 500 + 0.15*400*3 = 680 deposit.
    let first = rental_service::create_rental(state, &employee, book(date(2031, 3, 1), date(2031, 3, 5)))
        .await?
        .data
        .expect("rental");
    assert_eq!(first.total_cost, Decimal::from(2280));
    rental_service::create_rental(state, &employee, book(date(2031, 3, 10), date(2031, 3, 12))).await?;

    // Overlapping its own old period is fine; six days now cost 2400 + 800.
    let moved = rental_service::update_rental(
        state,
        &employee,
        first.id,
        UpdateRentalRequest {
            start_date: Some(date(2031, 3, 2)),
            expected_end_date: Some(date(2031, 3, 8)),
        },
    )
    .await?
    .data
    .expect("updated rental");
    assert_eq!(moved.start_date, date(2031, 3, 2));
    assert_eq!(moved.deposit_amount, Decimal::from(800));
    assert_eq!(moved.total_cost, Decimal::from(3200));

    let onto_other = rental_service::update_rental(
        state,
        &employee,
        first.id,
        UpdateRentalRequest {
            start_date: None,
            expected_end_date: Some(date(2031, 3, 10)),
        },
    )
    .await;
    assert!(matches!(onto_other, Err(AppError::Conflict(_))));

    // An ongoing rental with a penalty; deleting it removes both and frees the car.
    let ongoing = rental_service::create_rental(state, &employee, book(date(2024, 3, 1), date(2024, 3, 4)))
        .await?
        .data
        .expect("rental");
    penalty_service::create_penalty(
        state,
        &employee,
        CreatePenaltyRequest {
            rental_id: ongoing.id,
            amount: Decimal::from(150),
            reason: "Missing fuel".into(),
            date: Some(date(2024, 3, 2)),
        },
    )
    .await?;
    let row = Cars::find_by_id(car.id).one(&state.orm).await?.expect("car row");
    assert_eq!(row.status, CarStatus::Rented.as_str());

    let by_employee = rental_service::delete_rental(state, &employee, ongoing.id).await;
    assert!(matches!(by_employee, Err(AppError::Forbidden)));

    rental_service::delete_rental(state, &manager, ongoing.id).await?;
    let penalties = Penalties::find()
        .filter(PenaltyCol::RentalId.eq(ongoing.id))
        .count(&state.orm)
        .await?;
    assert_eq!(penalties, 0);
    let row = Cars::find_by_id(car.id).one(&state.orm).await?.expect("car row");
    assert_eq!(row.status, CarStatus::Available.as_str());

    Ok(())
}

async fn stale_tokens_follow_account_changes(state: &AppState) -> anyhow::Result<()> {
    let admin = create_user(state, "root-admin", Role::Admin).await?;
    let clerk = create_user(state, "night-clerk", Role::Employee).await?;

    let token = auth_service::login_user(
        state,
        LoginRequest {
            login: "night-clerk".into(),
            password: "password123".into(),
        },
    )
    .await?
    .data
    .expect("login")
    .token;

    let resolved = authenticate(state, &token).await?;
    assert_eq!(resolved.role, Role::Employee);
    assert!(ensure_staff(&resolved).is_ok());

    user_service::update_user(
        state,
        &admin,
        clerk.user_id,
        UpdateUserRequest {
            role: Some(Role::User),
            ..Default::default()
        },
    )
    .await?;
    let demoted = authenticate(state, &token).await?;
    assert_eq!(demoted.role, Role::User);
    assert!(matches!(ensure_staff(&demoted), Err(AppError::Forbidden)));

    user_service::update_user(
        state,
        &admin,
        clerk.user_id,
        UpdateUserRequest {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await?;
    let disabled = authenticate(state, &token).await;
    assert!(matches!(disabled, Err(AppError::Unauthorized(_))));

    user_service::delete_user(state, &admin, clerk.user_id).await?;
    let deleted = authenticate(state, &token).await;
    assert!(matches!(deleted, Err(AppError::Unauthorized(_))));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url, 5).await?;
    run_migrations(&pool).await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        jwt_ttl_hours: 1,
        db_max_connections: 5,
        upload_dir: std::env::temp_dir()
            .join("car-rental-api-test-uploads")
            .to_string_lossy()
            .into_owned(),
        max_upload_bytes: 1024 * 1024,
        penalty_max_amount: Decimal::from(1_000_000),
    };
    let state = AppState::new(pool, config);

    // Start from a clean slate for deterministic tests.
    state
        .orm
        .execute(Statement::from_string(
            state.orm.get_database_backend(),
            "TRUNCATE TABLE penalties, rentals, clients, cars, audit_logs, users RESTART IDENTITY CASCADE",
        ))
        .await?;

    Ok(state)
}

async fn create_user(state: &AppState, username: &str, role: Role) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set(hash_password("password123")?),
        role: Set(role.as_str().to_string()),
        full_name: Set(None),
        phone: Set(None),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        username: user.username,
        role,
    })
}
