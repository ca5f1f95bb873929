use std::env;

use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub db_max_connections: u32,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub penalty_max_amount: Decimal,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000);
        let jwt_ttl_hours = parse_or("JWT_TTL_HOURS", 24);
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", 10);
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        let max_upload_bytes = parse_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024);
        let penalty_max_amount = parse_or("PENALTY_MAX_AMOUNT", Decimal::from(1_000_000));
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            jwt_ttl_hours,
            db_max_connections,
            upload_dir,
            max_upload_bytes,
            penalty_max_amount,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
