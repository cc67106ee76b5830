//! Backend HTTP access.

mod client;
mod dto;
/// Backend route table.
pub mod endpoints;
mod ports;

pub use client::{ApiClient, SessionEvent};
