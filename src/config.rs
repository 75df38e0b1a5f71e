use serde::{Deserialize, Serialize};
use std::env;

/// SMTP credentials and recipient for price alerts.
///
/// The record is optional as a whole; when present, all three fields must be
/// non-empty for notifications to be sent. Partial configuration means
/// "notifications disabled", never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    pub sender_email: String,
    pub sender_password: String,
    pub receiver_email: String,
}

impl EmailSettings {
    pub fn new(sender_email: &str, sender_password: &str, receiver_email: &str) -> Self {
        Self {
            sender_email: sender_email.to_string(),
            sender_password: sender_password.to_string(),
            receiver_email: receiver_email.to_string(),
        }
    }

    /// Read settings from `SENDER_EMAIL`, `SENDER_PASSWORD` and
    /// `RECEIVER_EMAIL`. Returns `None` when none of the variables are set;
    /// missing variables otherwise become empty fields, which disable
    /// delivery via [`EmailSettings::is_complete`].
    pub fn from_env() -> Option<Self> {
        let sender_email = env::var("SENDER_EMAIL").ok();
        let sender_password = env::var("SENDER_PASSWORD").ok();
        let receiver_email = env::var("RECEIVER_EMAIL").ok();

        if sender_email.is_none() && sender_password.is_none() && receiver_email.is_none() {
            return None;
        }

        Some(Self {
            sender_email: sender_email.unwrap_or_default(),
            sender_password: sender_password.unwrap_or_default(),
            receiver_email: receiver_email.unwrap_or_default(),
        })
    }

    pub fn is_complete(&self) -> bool {
        !self.sender_email.is_empty()
            && !self.sender_password.is_empty()
            && !self.receiver_email.is_empty()
    }
}
