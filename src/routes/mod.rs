use axum::Router;

use crate::state::AppState;

pub mod analytics;
pub mod auth;
pub mod cars;
pub mod clients;
pub mod doc;
pub mod health;
pub mod params;
pub mod penalties;
pub mod rentals;
pub mod reports;
pub mod search;
pub mod upload;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/cars", cars::router())
        .nest("/clients", clients::router())
        .nest("/rentals", rentals::router())
        .nest("/penalties", penalties::router())
        .nest("/analytics", analytics::router())
        .nest("/reports", reports::router())
        .nest("/search", search::router())
        .nest("/upload", upload::router())
}
