pub mod loader;
pub mod types;

pub use loader::{ConfigInfo, ConfigStore, API_CONFIG_FILE, PREFERENCES_FILE};
pub use types::*;
