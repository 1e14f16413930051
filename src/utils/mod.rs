pub mod error;
pub mod filesystem;
pub mod logging;
pub mod progress;

pub use error::{ConfigError, Error, Result};
pub use filesystem::{bytes_to_mb, format_file_size, generate_scratch_dir};
pub use logging::setup_logging;
pub use progress::CallSpinner;
