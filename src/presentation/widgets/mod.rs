mod confirm_dialog;
mod data_table;
mod filter_bar;
mod footer_bar;
mod form_modal;
mod header_bar;
mod input;
mod stats_bar;
mod status_bar;

pub use confirm_dialog::ConfirmDialog;
pub use data_table::DataTable;
pub use filter_bar::FilterBar;
pub use footer_bar::{FooterBar, FooterBarStyle, KeyHint};
pub use form_modal::FormModal;
pub use header_bar::{HeaderBar, HeaderBarStyle};
pub use input::TextInput;
pub use stats_bar::StatsBar;
pub use status_bar::{StatusBar, StatusLevel};
