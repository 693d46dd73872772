//! API Module
//!
//! HTTP handlers and routing for the cache server REST API. This is the
//! server side of [`crate::cache::HttpBackend`].
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `POST /sets/:name`, `GET|DELETE /sets/:name/:member` - Set membership
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
