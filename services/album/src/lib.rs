//! Album service: token-gated media delivery over a SQLite user store
//!
//! The service exposes a small JSON auth API (login, change-password,
//! verify) and authenticated media endpoints that stream files from a
//! sandboxed uploads directory, with byte-range support for video.

pub mod catalog;
pub mod config;
pub mod error;
pub mod jwt;
pub mod media;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
