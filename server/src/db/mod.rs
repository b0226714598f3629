// covenant_server/src/db/mod.rs

//! PostgreSQL backend for the record store.

pub mod pg_store;

pub use pg_store::PgStore;
