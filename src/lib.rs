//! Busdesk - a terminal administration console for a bus-ticketing platform.
//!
//! Company administrators manage their fleet, trips, e-tickets and sales;
//! platform administrators manage companies, users, reviews and payments.
//! The crate follows a layered layout: domain records and ports, application
//! controllers and use cases, infrastructure adapters and a ratatui front end.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing controllers, use cases and DTOs.
pub mod application;
/// Domain layer containing entities, list semantics and port definitions.
pub mod domain;
/// Infrastructure layer containing the HTTP client, storage and configuration.
pub mod infrastructure;
/// Presentation layer containing UI components and event handling.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
