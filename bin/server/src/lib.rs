//! tether HTTP service.
//!
//! Exposes the relationship registry, the privacy-attribute registry and the
//! authorization checker over JSON routes, backed by PostgreSQL or by
//! in-memory stores.

pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod objects;
pub mod routes;
pub mod state;
