//! On-disk price history: a per-product JSON ledger mapping each URL to a
//! bounded, append-ordered list of observations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;

/// Observations kept per URL at rest; appends beyond this drop the oldest.
pub const MAX_OBSERVATIONS: usize = 10;

const FILE_PREFIX: &str = "price_history_";

/// One recorded price for a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl Observation {
    pub fn now(price: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            price,
        }
    }
}

/// URL -> observations, oldest first.
pub type Ledger = BTreeMap<String, Vec<Observation>>;

/// Turn a product identity into a stable filename stem: lowercase, every
/// non-alphanumeric character replaced with `_`, runs and edges collapsed.
/// Distinct identities can collide ("A B" and "a_b"); accepted limitation.
pub fn sanitize_identity(identity: &str) -> String {
    let substituted: String = identity
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();

    substituted
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn history_filename(identity: &str) -> String {
    format!("{FILE_PREFIX}{}.json", sanitize_identity(identity))
}

/// Loads and rewrites one product's ledger file. The ledger is always read
/// fully into memory before mutation and fully rewritten on save; there is
/// no locking, so concurrent processes on the same file are last-writer-wins
/// and a caller responsibility.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl AsRef<Path>, identity: &str) -> Self {
        Self {
            path: dir.as_ref().join(history_filename(identity)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger. Missing file, empty content and unparseable content
    /// all degrade to an empty ledger; corrupt files are logged and
    /// self-heal on the next save.
    pub fn load(&self) -> Ledger {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no history file yet");
                return Ledger::new();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read history file");
                return Ledger::new();
            }
        };

        if content.trim().is_empty() {
            return Ledger::new();
        }

        match serde_json::from_str(&content) {
            Ok(ledger) => ledger,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "history file is not valid JSON, starting from empty history"
                );
                Ledger::new()
            }
        }
    }

    /// Rewrite the whole file, pretty-printed with 2-space indentation.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        let json = serde_json::to_string_pretty(ledger)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
