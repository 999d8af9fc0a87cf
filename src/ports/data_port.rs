//! Market data access port.

use crate::domain::error::CouncilError;
use crate::domain::ohlcv::PriceBar;

pub trait DataPort {
    /// Full daily history for `symbol`, ascending by date. An unknown symbol
    /// is either an empty series or an error, depending on the source.
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<PriceBar>, CouncilError>;

    fn list_symbols(&self) -> Result<Vec<String>, CouncilError>;
}
