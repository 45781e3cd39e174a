pub mod config;
pub mod error;
pub mod fetch;
pub mod file_config;
pub mod types;

pub use config::AppConfig;
pub use error::RunError;
pub use fetch::Fetch;
pub use file_config::{load_config, FileConfig};
pub use types::*;
