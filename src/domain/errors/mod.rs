//! Domain error types.

mod api_error;
mod session_error;

pub use api_error::ApiError;
pub use session_error::SessionError;
