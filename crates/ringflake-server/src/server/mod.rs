//! Server-side components of the shortener.
//!
//! - [`config`] - CLI / environment configuration and validation.
//! - [`service`] - axum router, shared state and handlers.
//! - [`store`] / [`cache`] - where redirects are kept.
//! - [`telemetry`] - log subscriber setup.

pub mod cache;
pub mod config;
pub mod error;
pub mod service;
pub mod store;
pub mod telemetry;
