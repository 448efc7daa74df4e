use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::entities::breakout::BreakoutCandidate;
use crate::domain::entities::fundamentals::ValuePick;
use crate::domain::entities::region::Region;
use crate::domain::errors::ScanError;

/// One row of the breakout watchlist CSV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakoutRow {
    #[serde(rename = "Region")]
    pub region: Region,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Score")]
    pub score: u32,
    #[serde(rename = "RSI14")]
    pub rsi14: f64,
    #[serde(rename = "RVol")]
    pub rvol: f64,
    #[serde(rename = "BBW")]
    pub bb_width: f64,
    #[serde(rename = "Flags")]
    pub flags: String,
    #[serde(rename = "Link")]
    pub link: String,
}

impl From<&BreakoutCandidate> for BreakoutRow {
    fn from(candidate: &BreakoutCandidate) -> Self {
        BreakoutRow {
            region: candidate.region,
            symbol: candidate.symbol.clone(),
            price: candidate.price,
            score: candidate.score,
            rsi14: candidate.rsi14,
            rvol: candidate.rvol,
            bb_width: candidate.bb_width,
            flags: candidate.flags.clone(),
            link: candidate.link.clone(),
        }
    }
}

/// One row of the value watchlist CSV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValueRow {
    #[serde(rename = "Region")]
    pub region: Region,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Link")]
    pub link: String,
}

impl From<&ValuePick> for ValueRow {
    fn from(pick: &ValuePick) -> Self {
        ValueRow {
            region: pick.region,
            symbol: pick.symbol.clone(),
            name: pick.name.clone(),
            price: pick.price,
            reason: pick.reason.clone(),
            link: pick.link.clone(),
        }
    }
}

pub fn save_breakout_watchlist(
    path: impl AsRef<Path>,
    candidates: &[BreakoutCandidate],
) -> Result<(), ScanError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    for candidate in candidates {
        writer.serialize(BreakoutRow::from(candidate))?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = candidates.len(), "Saved breakout watchlist");
    Ok(())
}

pub fn load_breakout_watchlist(path: impl AsRef<Path>) -> Result<Vec<BreakoutRow>, ScanError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

pub fn save_value_watchlist(
    path: impl AsRef<Path>,
    picks: &[ValuePick],
) -> Result<(), ScanError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    for pick in picks {
        writer.serialize(ValueRow::from(pick))?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = picks.len(), "Saved value watchlist");
    Ok(())
}

pub fn load_value_watchlist(path: impl AsRef<Path>) -> Result<Vec<ValueRow>, ScanError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
