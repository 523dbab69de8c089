//! Tasktrack: a small task-tracking service.
//!
//! Tasks carry a title, an optional description and a lifecycle status, and
//! are exposed over a JSON HTTP API with create, lookup, filtered listing,
//! partial update and removal.
//!
//! # Architecture
//!
//! Tasktrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage
//! - **Adapters**: In-memory and `PostgreSQL` repositories, and the HTTP API
//!
//! # Modules
//!
//! - [`task`]: Task domain, repository port, adapters and service
//! - [`http`]: Axum router and JSON handlers
//! - [`config`]: Environment-driven settings
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod http;
pub mod task;
pub mod telemetry;
