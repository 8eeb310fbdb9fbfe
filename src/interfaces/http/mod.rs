//! HTTP REST API interfaces
//!
//! - `common`: error body, extractors and shared resource state
//! - `middleware`: API key verification
//! - `modules`: per-resource handlers and routes
//! - `router`: top-level router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
