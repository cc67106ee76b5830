//! Session store adapters.

mod file_session_store;
#[cfg(feature = "keyring")]
mod keyring_session_store;

pub use file_session_store::FileSessionStore;
#[cfg(feature = "keyring")]
pub use keyring_session_store::KeyringSessionStore;
