//! The check-cycle orchestrator: reconciles one freshly observed price
//! against the stored ledger, decides whether a change event occurred, and
//! persists history.

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::EmailSettings;
use crate::error::Error;
use crate::extractor;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::history::{HistoryStore, Ledger, MAX_OBSERVATIONS, Observation};
use crate::notifier::{EmailNotifier, Notifier, PriceAlert};

/// Inputs for one product's monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub url: String,
    pub price_selector: String,
    /// Fallback identity when the page title cannot be resolved.
    pub product_name: Option<String>,
    pub email_settings: Option<EmailSettings>,
    /// Directory holding the history file; defaults to the working
    /// directory.
    pub history_dir: PathBuf,
}

impl MonitorConfig {
    pub fn new(url: &str, price_selector: &str) -> Self {
        Self {
            url: url.to_string(),
            price_selector: price_selector.to_string(),
            product_name: None,
            email_settings: None,
            history_dir: PathBuf::from("."),
        }
    }
}

/// Result of one check cycle. Every failure mode degrades to `Skipped`;
/// nothing propagates to the caller.
#[derive(Debug)]
pub enum CheckOutcome {
    /// No prior observation for this URL; one entry recorded, no alert.
    FirstObservation { price: f64 },
    /// Price equals the last observation exactly; nothing written.
    Unchanged { price: f64 },
    /// Change event: alert attempted, observation appended and persisted.
    Changed { previous: f64, current: f64 },
    /// Price unavailable this cycle; ledger untouched.
    Skipped(Error),
}

pub struct Monitor {
    url: String,
    price_selector: String,
    product_identity: String,
    store: HistoryStore,
    ledger: Ledger,
    fetcher: Box<dyn PageFetcher>,
    notifier: Box<dyn Notifier>,
}

impl Monitor {
    /// Build a monitor with the production fetcher and email notifier.
    pub async fn new(config: MonitorConfig) -> crate::Result<Self> {
        let fetcher = Box::new(HttpFetcher::new()?);
        let notifier = Box::new(EmailNotifier::new(config.email_settings.clone()));
        Ok(Self::with_collaborators(config, fetcher, notifier).await)
    }

    /// Build a monitor around explicit collaborators. Infallible: the title
    /// fetch is best effort and falls back to the configured name or URL,
    /// and an unreadable history file degrades to an empty ledger.
    pub async fn with_collaborators(
        config: MonitorConfig,
        fetcher: Box<dyn PageFetcher>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let title = match fetcher.fetch(&config.url).await {
            Ok(html) => extractor::page_title(&html),
            Err(err) => {
                debug!(url = %config.url, error = %err, "title fetch failed, falling back");
                None
            }
        };
        let product_identity = title
            .or(config.product_name)
            .unwrap_or_else(|| config.url.clone());

        let store = HistoryStore::new(&config.history_dir, &product_identity);
        debug!(
            product = %product_identity,
            path = %store.path().display(),
            "loading price history"
        );
        let ledger = store.load();

        Self {
            url: config.url,
            price_selector: config.price_selector,
            product_identity,
            store,
            ledger,
            fetcher,
            notifier,
        }
    }

    pub fn product_identity(&self) -> &str {
        &self.product_identity
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Run one fetch-compare-persist cycle.
    pub async fn check_price_change(&mut self) -> CheckOutcome {
        let price = match self.current_price().await {
            Ok(price) => price,
            Err(err) => {
                warn!(url = %self.url, error = %err, "price unavailable this cycle");
                return CheckOutcome::Skipped(err);
            }
        };

        let last = self
            .ledger
            .get(&self.url)
            .and_then(|observations| observations.last())
            .map(|observation| observation.price);

        match last {
            None => {
                info!(url = %self.url, price, "first observation for this URL");
                self.ledger
                    .insert(self.url.clone(), vec![Observation::now(price)]);
                self.persist();
                CheckOutcome::FirstObservation { price }
            }
            // Exact equality is deliberate: 9.99 and 9.990 parse to the same
            // float and must not alert.
            Some(last) if last == price => {
                debug!(url = %self.url, price, "no price change detected");
                CheckOutcome::Unchanged { price }
            }
            Some(last) => {
                info!(url = %self.url, previous = last, current = price, "price changed");

                // Notify before mutating: a delivery failure must not stop
                // history from recording the new price.
                let alert = PriceAlert {
                    product: self.product_identity.clone(),
                    url: self.url.clone(),
                    old_price: last,
                    new_price: price,
                };
                if let Err(err) = self.notifier.notify(&alert).await {
                    warn!(url = %self.url, error = %err, "price alert delivery failed");
                }

                let observations = self.ledger.entry(self.url.clone()).or_default();
                observations.push(Observation::now(price));
                if observations.len() > MAX_OBSERVATIONS {
                    let excess = observations.len() - MAX_OBSERVATIONS;
                    observations.drain(..excess);
                }
                self.persist();
                CheckOutcome::Changed {
                    previous: last,
                    current: price,
                }
            }
        }
    }

    async fn current_price(&self) -> crate::Result<f64> {
        let html = self.fetcher.fetch(&self.url).await?;
        extractor::extract_price(&html, &self.price_selector)
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.ledger) {
            warn!(
                path = %self.store.path().display(),
                error = %err,
                "failed to save price history"
            );
        }
    }
}
