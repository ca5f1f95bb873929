pub mod audit_logs;
pub mod cars;
pub mod clients;
pub mod penalties;
pub mod rentals;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cars::Entity as Cars;
pub use clients::Entity as Clients;
pub use penalties::Entity as Penalties;
pub use rentals::Entity as Rentals;
pub use users::Entity as Users;
