//! # Storage Module
//!
//! The persistence gateway. [`DbConnection`] is the sole component issuing
//! statements against SQLite; it hands back raw rows or write metadata and
//! turns every driver fault into [`crate::error::InternalError`] after
//! logging it.

pub mod connection;

pub use connection::{internal_error, DbConnection, SqliteQuery, WriteOutcome};
