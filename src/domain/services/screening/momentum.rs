use crate::domain::services::screening::FactorScore;

/// Scores momentum from the 14-day RSI of a snapshot that already passed the
/// momentum gate (RSI between 50 and 85).
pub trait MomentumScoreCalculator {
    fn calculate(&self, rsi: f64) -> FactorScore;
}

/// The pre-breakout band (RSI drifting up without being stretched) scores
/// highest; the power zone just above it still earns extra points.
pub struct RsiMomentumCalculator {
    pub pre_breakout_min: f64,
    pub pre_breakout_max: f64,
    pub power_zone_max: f64,
    pub pre_breakout_points: u32,
    pub power_zone_points: u32,
    pub base_points: u32,
}

impl Default for RsiMomentumCalculator {
    fn default() -> Self {
        RsiMomentumCalculator {
            pre_breakout_min: 55.0,
            pre_breakout_max: 70.0,
            power_zone_max: 80.0,
            pre_breakout_points: 15,
            power_zone_points: 10,
            base_points: 5,
        }
    }
}

impl MomentumScoreCalculator for RsiMomentumCalculator {
    fn calculate(&self, rsi: f64) -> FactorScore {
        if rsi >= self.pre_breakout_min && rsi <= self.pre_breakout_max {
            FactorScore::new(self.pre_breakout_points, Some("Momentum: RSI pre-breakout"))
        } else if rsi > self.pre_breakout_max && rsi <= self.power_zone_max {
            FactorScore::new(self.power_zone_points, Some("Momentum: RSI power zone"))
        } else {
            FactorScore::new(self.base_points, None)
        }
    }
}
