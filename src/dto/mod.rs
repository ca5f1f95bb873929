pub mod analytics;
pub mod auth;
pub mod cars;
pub mod clients;
pub mod penalties;
pub mod rentals;
pub mod reports;
pub mod search;
pub mod upload;
pub mod users;
