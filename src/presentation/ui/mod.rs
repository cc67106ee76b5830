//! UI screens.

mod app;
mod console_tab;
mod dashboard_screen;
mod list_screen;
mod login_screen;
/// Layout helpers.
pub mod utils;

pub use app::App;
pub use console_tab::{ConsoleTab, KeyOutcome, TabEffect, TabEvent};
pub use dashboard_screen::DashboardScreen;
pub use list_screen::ListScreen;
pub use login_screen::{AuthMode, LoginAction, LoginScreen, LoginState};
