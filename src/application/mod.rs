//! Application layer with use cases, list controllers and DTOs.

/// Data transfer objects.
pub mod dto;
/// List and dashboard controllers.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use services::{DashboardController, ListController};
pub use use_cases::{LoginUseCase, LogoutUseCase, RegisterUseCase, ResolveSessionUseCase};
