//! Trading ledger port. The core only reads snapshots through it.

use crate::domain::error::CouncilError;
use crate::domain::ledger::Portfolio;

pub trait LedgerPort {
    fn load_portfolio(&self) -> Result<Portfolio, CouncilError>;
}
