use async_trait::async_trait;
use chrono::Local;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::config::EmailSettings;
use crate::error::Result;

const SMTP_RELAY: &str = "smtp.gmail.com";

/// Details of one change event, handed to the notifier before the ledger is
/// mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceAlert {
    pub product: String,
    pub url: String,
    pub old_price: f64,
    pub new_price: f64,
}

/// Delivers a price-change alert. Delivery failures surface as errors; the
/// Monitor logs them and completes the cycle regardless.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &PriceAlert) -> Result<()>;
}

/// SMTP email notifier over implicit TLS.
pub struct EmailNotifier {
    settings: Option<EmailSettings>,
    relay: String,
}

impl EmailNotifier {
    pub fn new(settings: Option<EmailSettings>) -> Self {
        Self {
            settings,
            relay: SMTP_RELAY.to_string(),
        }
    }

    pub fn with_relay(settings: Option<EmailSettings>, relay: &str) -> Self {
        Self {
            settings,
            relay: relay.to_string(),
        }
    }

    fn format_subject(alert: &PriceAlert) -> String {
        format!(
            "Price Change Alert for {}: {} -> {}",
            alert.product, alert.old_price, alert.new_price
        )
    }

    fn format_body(alert: &PriceAlert) -> String {
        format!(
            "Price has changed for {}\n\
             URL: {}\n\
             \n\
             New price: {}\n\
             Old price: {}\n\
             \n\
             Timestamp: {}\n",
            alert.product,
            alert.url,
            alert.new_price,
            alert.old_price,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, alert: &PriceAlert) -> Result<()> {
        let Some(settings) = self.settings.as_ref().filter(|s| s.is_complete()) else {
            debug!(
                product = %alert.product,
                "email settings absent or incomplete, skipping notification"
            );
            return Ok(());
        };

        let message = Message::builder()
            .from(settings.sender_email.parse()?)
            .to(settings.receiver_email.parse()?)
            .subject(Self::format_subject(alert))
            .header(ContentType::TEXT_PLAIN)
            .body(Self::format_body(alert))?;

        let credentials = Credentials::new(
            settings.sender_email.clone(),
            settings.sender_password.clone(),
        );
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.relay)?
            .credentials(credentials)
            .build();

        mailer.send(message).await?;
        info!(
            product = %alert.product,
            old = alert.old_price,
            new = alert.new_price,
            "price alert sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> PriceAlert {
        PriceAlert {
            product: "Acme Widget".to_string(),
            url: "https://example.com/widget".to_string(),
            old_price: 19.99,
            new_price: 17.50,
        }
    }

    #[test]
    fn test_subject_format() {
        assert_eq!(
            EmailNotifier::format_subject(&alert()),
            "Price Change Alert for Acme Widget: 19.99 -> 17.5"
        );
    }

    #[test]
    fn test_body_contains_details() {
        let body = EmailNotifier::format_body(&alert());
        assert!(body.contains("Price has changed for Acme Widget"));
        assert!(body.contains("URL: https://example.com/widget"));
        assert!(body.contains("New price: 17.5"));
        assert!(body.contains("Old price: 19.99"));
        assert!(body.contains("Timestamp: "));
    }

    #[tokio::test]
    async fn test_notify_without_settings_is_noop() {
        let notifier = EmailNotifier::new(None);
        assert!(notifier.notify(&alert()).await.is_ok());
    }

    #[tokio::test]
    async fn test_notify_with_incomplete_settings_is_noop() {
        let settings = EmailSettings::new("a@example.com", "", "b@example.com");
        let notifier = EmailNotifier::new(Some(settings));
        // Never touches the network; missing password disables delivery.
        assert!(notifier.notify(&alert()).await.is_ok());
    }
}
