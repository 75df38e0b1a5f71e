pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod history;
pub mod monitor;
pub mod notifier;

// Re-export commonly used types
pub use config::EmailSettings;
pub use error::Error;
pub use monitor::{CheckOutcome, Monitor, MonitorConfig};

pub type Result<T> = std::result::Result<T, Error>;
