//! Application services driving the console tabs.

mod dashboard_controller;
mod list_controller;

pub use dashboard_controller::{DashboardController, DashboardEvent};
pub use list_controller::{Effect, ListController, ListEvent, LoadState, Mutation};
