use tracing::debug;

use crate::domain::services::screening::{
    BreakoutSnapshot, HighProximityCalculator, MomentumScoreCalculator, ProximityScoreCalculator,
    RelativeVolumeCalculator, RsiMomentumCalculator, SqueezeVolatilityCalculator,
    StackedTrendCalculator, TrendScoreCalculator, VolatilityScoreCalculator,
    VolumeScoreCalculator,
};

/// Gate thresholds a snapshot must clear before any points are awarded.
#[derive(Debug, Clone)]
pub struct BreakoutGates {
    pub rsi_min: f64,
    pub rsi_max: f64,
    pub rvol_min: f64,
    /// Minimum close / 52-week-high ratio.
    pub proximity_min: f64,
}

impl Default for BreakoutGates {
    fn default() -> Self {
        BreakoutGates {
            rsi_min: 50.0,
            rsi_max: 85.0,
            rvol_min: 1.3,
            proximity_min: 0.9,
        }
    }
}

/// Additive breakout score with the flags that explain it.
#[derive(Debug, Clone)]
pub struct BreakoutScore {
    /// Sum of all factor points, at most 100.
    pub total: u32,
    pub flags: Vec<&'static str>,
}

impl BreakoutScore {
    pub fn joined_flags(&self) -> String {
        self.flags.join("; ")
    }
}

/// Applies the gate filters and sums the five factor scores.
pub struct BreakoutAggregator {
    gates: BreakoutGates,
    trend_calc: StackedTrendCalculator,
    volatility_calc: SqueezeVolatilityCalculator,
    momentum_calc: RsiMomentumCalculator,
    volume_calc: RelativeVolumeCalculator,
    proximity_calc: HighProximityCalculator,
}

impl Default for BreakoutAggregator {
    fn default() -> Self {
        BreakoutAggregator {
            gates: BreakoutGates::default(),
            trend_calc: StackedTrendCalculator::default(),
            volatility_calc: SqueezeVolatilityCalculator::default(),
            momentum_calc: RsiMomentumCalculator::default(),
            volume_calc: RelativeVolumeCalculator::default(),
            proximity_calc: HighProximityCalculator::default(),
        }
    }
}

impl BreakoutAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gates(gates: BreakoutGates) -> Self {
        BreakoutAggregator {
            gates,
            ..Self::default()
        }
    }

    /// Score a snapshot, or reject it at the first failed gate.
    ///
    /// Rejection is the common case across a universe scan; every gate logs
    /// its reason at debug level so a filtered symbol can be explained.
    pub fn score(&self, symbol: &str, snapshot: &BreakoutSnapshot) -> Option<BreakoutScore> {
        if !(snapshot.close > snapshot.sma50 && snapshot.close > snapshot.sma200) {
            debug!(
                symbol = %symbol,
                close = snapshot.close,
                sma50 = snapshot.sma50,
                sma200 = snapshot.sma200,
                "Rejected by trend gate"
            );
            return None;
        }

        let bb_width = snapshot.bb_width?;
        let bbw_mean50 = snapshot.bbw_mean50?;
        if bb_width >= bbw_mean50 {
            debug!(
                symbol = %symbol,
                bb_width = bb_width,
                bbw_mean50 = bbw_mean50,
                "Rejected by volatility-compression gate"
            );
            return None;
        }

        if snapshot.rsi14 < self.gates.rsi_min || snapshot.rsi14 > self.gates.rsi_max {
            debug!(symbol = %symbol, rsi14 = snapshot.rsi14, "Rejected by momentum gate");
            return None;
        }

        let rvol = snapshot.rvol?;
        if rvol < self.gates.rvol_min {
            debug!(symbol = %symbol, rvol = rvol, "Rejected by volume gate");
            return None;
        }

        let high_252 = snapshot.high_252?;
        let proximity = snapshot.close / high_252;
        if proximity < self.gates.proximity_min {
            debug!(
                symbol = %symbol,
                proximity = proximity,
                "Rejected by 52-week proximity gate"
            );
            return None;
        }

        let factors = [
            self.trend_calc.calculate(snapshot),
            self.volatility_calc
                .calculate(bb_width, bbw_mean50, snapshot.bbw_min120),
            self.momentum_calc.calculate(snapshot.rsi14),
            self.volume_calc.calculate(rvol),
            self.proximity_calc.calculate(proximity),
        ];

        let total = factors.iter().map(|f| f.points).sum();
        let flags = factors.iter().filter_map(|f| f.flag).collect();
        let score = BreakoutScore { total, flags };

        debug!(
            symbol = %symbol,
            score = score.total,
            flags = %score.joined_flags(),
            "Breakout score computed"
        );

        Some(score)
    }
}
