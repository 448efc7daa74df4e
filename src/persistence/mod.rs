//! Persistence Layer
//!
//! Scan results are persisted as CSV watchlists, one row per accepted
//! symbol, so they can be opened directly in a spreadsheet or fed to other
//! tooling.

pub mod watchlist;
