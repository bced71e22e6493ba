pub mod config;
pub mod migrations;
pub mod store;

pub use config::PostgresRevisionConfig;
pub use store::PostgresRevisionStore;
