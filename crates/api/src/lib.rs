//! HTTP service for the product catalog.
//!
//! Exposes every catalog entity under `/api/v1` through one set of generic
//! handlers, plus the product creation wizard and `GET /health`.

pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod router;
pub mod routes;
pub mod service;
pub mod state;
pub mod wizard;
