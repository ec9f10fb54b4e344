//! Settings and dependency initialization.
mod dependencies;
mod settings;

pub use dependencies::{ConnectionMode, Dependencies};
pub use settings::{AppConfig, DatabaseSettings, FirebaseSettings, ServerSettings};
