//! Common library for the album backend
//!
//! This crate provides shared infrastructure used by the album service:
//! SQLite connectivity, schema setup, and database error handling.

pub mod database;
pub mod error;
