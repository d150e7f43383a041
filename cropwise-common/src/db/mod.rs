//! Database initialization, schema and reference data

pub mod init;
pub mod seed;

pub use init::{init_database, init_schema};
pub use seed::seed_reference_data;
