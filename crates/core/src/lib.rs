//! r2dec Core - Host interface and settings shared by the r2dec crates.

mod error;
mod host;
pub mod settings;

pub use error::{Result, SettingError};
pub use host::Host;
pub use settings::{Setting, SettingValue, default_settings};
