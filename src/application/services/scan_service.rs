use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::domain::entities::breakout::BreakoutCandidate;
use crate::domain::entities::fundamentals::ValuePick;
use crate::domain::entities::region::Region;
use crate::domain::errors::ScanError;
use crate::domain::repositories::market_data::{HistoryRange, MarketDataProvider};
use crate::domain::services::screening::{BreakoutAggregator, BreakoutSnapshot};
use crate::domain::services::value_screen::ValueScreen;

/// One unit of scan work: a symbol and the region it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanJob {
    pub symbol: String,
    pub region: Region,
}

/// Runs a universe scan against a market data provider.
///
/// Per-symbol work is independent and side-effect free, so jobs fan out onto
/// a `JoinSet` bounded by a semaphore sized to `max_workers`. Any failure is
/// confined to its symbol: the scan logs it and moves on.
pub struct ScanService<P> {
    provider: Arc<P>,
    config: ScanConfig,
    aggregator: Arc<BreakoutAggregator>,
    value_screen: Arc<ValueScreen>,
}

impl<P: MarketDataProvider + 'static> ScanService<P> {
    pub fn new(provider: Arc<P>, config: ScanConfig) -> Self {
        let value_screen = Arc::new(ValueScreen::new(config.value_screen.clone()));
        ScanService {
            provider,
            config,
            aggregator: Arc::new(BreakoutAggregator::new()),
            value_screen,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Flatten the configured universe into jobs, scanning each symbol once
    /// under the first region that lists it.
    pub fn build_jobs(&self) -> Vec<ScanJob> {
        let mut seen = HashSet::new();
        let mut jobs = Vec::new();
        for (region, symbols) in &self.config.universe {
            for symbol in symbols {
                if seen.insert(symbol.clone()) {
                    jobs.push(ScanJob {
                        symbol: symbol.clone(),
                        region: *region,
                    });
                }
            }
        }
        jobs
    }

    /// Scan the universe for breakout setups. Results come back ranked by
    /// score (then region and symbol); the save cut is applied separately.
    pub async fn run_breakout_scan(&self) -> Result<Vec<BreakoutCandidate>, ScanError> {
        let jobs = self.build_jobs();
        if jobs.is_empty() {
            return Err(ScanError::InvalidConfiguration(
                "scan universe is empty".to_string(),
            ));
        }
        let total = jobs.len();
        info!(total = total, "Starting global breakout scan");

        let semaphore = Arc::new(Semaphore::new(self.config.max_workers));
        let mut tasks = JoinSet::new();
        for job in jobs {
            let provider = Arc::clone(&self.provider);
            let aggregator = Arc::clone(&self.aggregator);
            let semaphore = Arc::clone(&semaphore);
            let min_bars = self.config.min_bars;
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .expect("scan semaphore is never closed");
                analyze_breakout(provider.as_ref(), &aggregator, min_bars, &job).await
            });
        }

        let mut results = Vec::new();
        let mut completed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            completed += 1;
            debug!(completed = completed, total = total, "Scan progress");
            let outcome = joined.map_err(|e| ScanError::TaskJoin(e.to_string()))?;
            if let Some(candidate) = outcome {
                info!(
                    region = %candidate.region,
                    symbol = %candidate.symbol,
                    score = candidate.score,
                    rsi14 = candidate.rsi14,
                    rvol = candidate.rvol,
                    flags = %candidate.flags,
                    "Breakout candidate"
                );
                results.push(candidate);
            }
        }

        BreakoutCandidate::rank(&mut results);
        info!(
            scanned = total,
            candidates = results.len(),
            "Breakout scan finished"
        );
        Ok(results)
    }

    /// Candidates that clear the configured save threshold.
    pub fn saveable(&self, results: &[BreakoutCandidate]) -> Vec<BreakoutCandidate> {
        results
            .iter()
            .filter(|c| c.score >= self.config.min_score_to_save)
            .cloned()
            .collect()
    }

    /// Scan the universe for value picks. Results come back ranked by region
    /// and symbol.
    pub async fn run_value_scan(&self) -> Result<Vec<ValuePick>, ScanError> {
        let jobs = self.build_jobs();
        if jobs.is_empty() {
            return Err(ScanError::InvalidConfiguration(
                "scan universe is empty".to_string(),
            ));
        }
        let total = jobs.len();
        info!(total = total, "Starting global value scan");

        let semaphore = Arc::new(Semaphore::new(self.config.max_workers));
        let mut tasks = JoinSet::new();
        for job in jobs {
            let provider = Arc::clone(&self.provider);
            let screen = Arc::clone(&self.value_screen);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .expect("scan semaphore is never closed");
                analyze_value(provider.as_ref(), &screen, &job).await
            });
        }

        let mut results = Vec::new();
        let mut completed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            completed += 1;
            debug!(completed = completed, total = total, "Scan progress");
            let outcome = joined.map_err(|e| ScanError::TaskJoin(e.to_string()))?;
            if let Some(pick) = outcome {
                info!(
                    region = %pick.region,
                    symbol = %pick.symbol,
                    name = %pick.name,
                    reason = %pick.reason,
                    "Value pick"
                );
                results.push(pick);
            }
        }

        ValuePick::rank(&mut results);
        info!(scanned = total, picks = results.len(), "Value scan finished");
        Ok(results)
    }
}

async fn analyze_breakout<P: MarketDataProvider>(
    provider: &P,
    aggregator: &BreakoutAggregator,
    min_bars: usize,
    job: &ScanJob,
) -> Option<BreakoutCandidate> {
    let candles = match provider.daily_history(&job.symbol, HistoryRange::OneYear).await {
        Ok(candles) => candles,
        Err(e) => {
            warn!(symbol = %job.symbol, error = %e, "Skipping symbol: history fetch failed");
            return None;
        }
    };

    let snapshot = match BreakoutSnapshot::from_candles(&candles, min_bars) {
        Some(snapshot) => snapshot,
        None => {
            debug!(
                symbol = %job.symbol,
                bars = candles.len(),
                "Skipping symbol: not enough usable history"
            );
            return None;
        }
    };

    let score = aggregator.score(&job.symbol, &snapshot)?;

    Some(BreakoutCandidate {
        region: job.region,
        symbol: job.symbol.clone(),
        price: round2(snapshot.close),
        score: score.total,
        rsi14: round2(snapshot.rsi14),
        rvol: round2(snapshot.rvol.unwrap_or(0.0)),
        bb_width: snapshot.bb_width.unwrap_or(0.0),
        flags: score.joined_flags(),
        link: BreakoutCandidate::quote_link(&job.symbol),
        scanned_at: Utc::now(),
    })
}

async fn analyze_value<P: MarketDataProvider>(
    provider: &P,
    screen: &ValueScreen,
    job: &ScanJob,
) -> Option<ValuePick> {
    let snapshot = match provider.fundamentals(&job.symbol).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(symbol = %job.symbol, error = %e, "Skipping symbol: fundamentals fetch failed");
            return None;
        }
    };

    let verdict = screen.evaluate(&job.symbol, &snapshot)?;
    let name = snapshot.short_name.unwrap_or_else(|| job.symbol.clone());

    Some(ValuePick {
        region: job.region,
        symbol: job.symbol.clone(),
        name,
        price: verdict.price,
        reason: verdict.reason,
        link: BreakoutCandidate::quote_link(&job.symbol),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
