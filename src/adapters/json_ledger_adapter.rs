//! Trading ledger snapshot stored as a JSON document.

use crate::domain::error::CouncilError;
use crate::domain::ledger::Portfolio;
use crate::ports::ledger_port::LedgerPort;
use std::fs;
use std::path::PathBuf;

pub struct JsonLedgerAdapter {
    path: PathBuf,
}

impl JsonLedgerAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl LedgerPort for JsonLedgerAdapter {
    fn load_portfolio(&self) -> Result<Portfolio, CouncilError> {
        let content = fs::read_to_string(&self.path).map_err(|e| CouncilError::Ledger {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        serde_json::from_str(&content).map_err(|e| CouncilError::Ledger {
            reason: format!("invalid ledger {}: {}", self.path.display(), e),
        })
    }
}
