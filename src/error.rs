use thiserror::Error;

/// Crate-wide error type. Every check-cycle failure is one of these kinds so
/// callers and tests can distinguish causes instead of matching on log text.
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Invalid CSS selector: {selector}")]
    InvalidSelector { selector: String },

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Could not parse price from text: {text:?}")]
    ParsePrice { text: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Email build error: {0}")]
    Email(#[from] lettre::error::Error),

    #[error("Email address error: {0}")]
    Address(#[from] lettre::address::AddressError),
}

impl Error {
    /// True for the failures the Monitor treats as "price unavailable this
    /// cycle": fetch errors, selector misses, and unparseable price text.
    pub fn is_price_unavailable(&self) -> bool {
        matches!(
            self,
            Error::Fetch(_)
                | Error::InvalidSelector { .. }
                | Error::ElementNotFound { .. }
                | Error::ParsePrice { .. }
        )
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
