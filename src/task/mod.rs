//! Task tracking for tasktrack.
//!
//! This module implements creation, lookup, filtered listing, partial
//! update and removal of tasks. It follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
