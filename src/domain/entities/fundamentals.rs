use serde::{Deserialize, Serialize};

use crate::domain::entities::region::Region;

/// Snapshot of the fundamental figures the value screen looks at.
///
/// Every field is optional: the upstream data service omits whatever it does
/// not know for a symbol, and the screen decides which gaps are fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    pub current_price: Option<f64>,
    pub two_hundred_day_average: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub short_name: Option<String>,
}

/// A symbol that passed the value screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuePick {
    pub region: Region,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    /// Which valuation rule admitted the symbol (e.g. "PEG 1.2").
    pub reason: String,
    pub link: String,
}

impl ValuePick {
    /// Sort picks for the watchlist: region, then symbol.
    pub fn rank(results: &mut Vec<ValuePick>) {
        results.sort_by(|a, b| a.region.cmp(&b.region).then(a.symbol.cmp(&b.symbol)));
    }
}
