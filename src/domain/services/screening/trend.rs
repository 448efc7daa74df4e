use crate::domain::services::screening::{BreakoutSnapshot, FactorScore};

/// Scores trend quality of a snapshot that already passed the trend gate.
pub trait TrendScoreCalculator {
    fn calculate(&self, snapshot: &BreakoutSnapshot) -> FactorScore;
}

/// Rewards a perfectly stacked moving-average ladder over a plain
/// above-the-long-averages setup.
pub struct StackedTrendCalculator {
    pub stacked_points: u32,
    pub base_points: u32,
}

impl Default for StackedTrendCalculator {
    fn default() -> Self {
        StackedTrendCalculator {
            stacked_points: 20,
            base_points: 10,
        }
    }
}

impl TrendScoreCalculator for StackedTrendCalculator {
    fn calculate(&self, snapshot: &BreakoutSnapshot) -> FactorScore {
        let stacked = snapshot.close > snapshot.ema10
            && snapshot.ema10 > snapshot.ema20
            && snapshot.ema20 > snapshot.sma50
            && snapshot.sma50 > snapshot.sma200;
        if stacked {
            FactorScore::new(self.stacked_points, Some("Trend: perfect EMA stacking"))
        } else {
            FactorScore::new(self.base_points, Some("Trend: above 50/200 SMA"))
        }
    }
}
