//! stockscan
//!
//! Personal stock-screening toolkit: scans configurable ticker universes for
//! breakout setups (trend, volatility compression, momentum, relative volume,
//! 52-week-high proximity) and for value picks (fundamentals filter), then
//! writes the survivors to CSV watchlists.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod persistence;
