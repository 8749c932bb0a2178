//! API Module
//!
//! HTTP handlers and routing for the cache gateway.
//!
//! # Endpoints
//! - `PUT|GET|DELETE /cache/:key` - Single-key operations
//! - `POST /batch/{set,get,delete}` - Batch operations
//! - `POST /pattern/delete` - Pattern deletion
//! - `GET /stats` - In-memory statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
