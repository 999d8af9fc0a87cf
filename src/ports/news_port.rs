//! Headline source port for the news-sentiment analyst.

use crate::domain::error::CouncilError;

pub trait NewsPort {
    /// Recent headlines for `symbol`; empty when none are known.
    fn headlines(&self, symbol: &str) -> Result<Vec<String>, CouncilError>;
}
