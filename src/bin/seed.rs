use car_rental_api::{
    config::AppConfig,
    db::{DbPool, create_pool, run_migrations},
    services::auth_service::hash_password,
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 2).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "admin", "admin@example.com", "admin123", "admin").await?;
    ensure_user(&pool, "manager", "manager@example.com", "manager123", "manager").await?;
    ensure_user(&pool, "employee", "employee@example.com", "employee123", "employee").await?;
    seed_cars(&pool).await?;
    seed_clients(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_user(
    pool: &DbPool,
    username: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (username) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {username} (role={role})");
    Ok(id)
}

async fn seed_cars(pool: &DbPool) -> anyhow::Result<()> {
    // brand, model, year, type, price per day, deposit, transmission, seats
    let cars = [
        ("Toyota", "Corolla", 2021, "economy", 2500, 10000, "automatic", 5),
        ("Kia", "Rio", 2022, "economy", 2200, 8000, "manual", 5),
        ("Skoda", "Superb", 2022, "business", 4500, 20000, "automatic", 5),
        ("BMW", "530i", 2023, "business", 7000, 30000, "automatic", 5),
        ("Mercedes-Benz", "S 500", 2023, "premium", 15000, 60000, "automatic", 5),
        ("Porsche", "Cayenne", 2022, "premium", 18000, 80000, "automatic", 5),
    ];

    for (brand, model, year, car_type, price, deposit, transmission, seats) in cars {
        sqlx::query(
            r#"
            INSERT INTO cars (id, brand, model, year, "type", price_per_day, deposit, transmission, seats)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9
            WHERE NOT EXISTS (SELECT 1 FROM cars WHERE brand = $2 AND model = $3 AND year = $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(brand)
        .bind(model)
        .bind(year)
        .bind(car_type)
        .bind(Decimal::from(price))
        .bind(Decimal::from(deposit))
        .bind(transmission)
        .bind(seats)
        .execute(pool)
        .await?;
    }

    println!("Seeded cars");
    Ok(())
}

async fn seed_clients(pool: &DbPool) -> anyhow::Result<()> {
    let clients = [
        ("Ivan Petrov", "12 Lenina St, Moscow", "+7 900 111-22-33", Some("ivan@example.com")),
        ("Anna Smirnova", "5 Nevsky Ave, Saint Petersburg", "+7 900 444-55-66", None),
        ("Oleg Sidorov", "8 Mira St, Kazan", "+7 900 777-88-99", Some("oleg@example.com")),
    ];

    for (full_name, address, phone, email) in clients {
        sqlx::query(
            r#"
            INSERT INTO clients (id, full_name, address, phone, email)
            SELECT $1, $2, $3, $4, $5
            WHERE NOT EXISTS (SELECT 1 FROM clients WHERE phone = $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(full_name)
        .bind(address)
        .bind(phone)
        .bind(email)
        .execute(pool)
        .await?;
    }

    println!("Seeded clients");
    Ok(())
}
