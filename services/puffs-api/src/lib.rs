//! PuffsIndex API Service Library
//!
//! This crate provides the HTTP server that resolves a place to
//! coordinates, fetches a live AQI reading, and serves place pages
//! with a cigarette-equivalent figure, either pre-built (static mode)
//! or on demand (deferred mode).

pub mod config;
pub mod error;
pub mod geocoding;
pub mod handlers;
pub mod orchestrator;
pub mod page_cache;
pub mod prewarm;
pub mod provider;
pub mod routes;
pub mod state;
