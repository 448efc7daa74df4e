pub mod aggregator;
pub mod momentum;
pub mod proximity;
pub mod snapshot;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use aggregator::{BreakoutAggregator, BreakoutScore};
pub use momentum::{MomentumScoreCalculator, RsiMomentumCalculator};
pub use proximity::{HighProximityCalculator, ProximityScoreCalculator};
pub use snapshot::BreakoutSnapshot;
pub use trend::{StackedTrendCalculator, TrendScoreCalculator};
pub use volatility::{SqueezeVolatilityCalculator, VolatilityScoreCalculator};
pub use volume::{RelativeVolumeCalculator, VolumeScoreCalculator};

/// Points one factor contributes to the breakout score, with the flag text
/// that explains them (factors award their floor tier silently).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorScore {
    pub points: u32,
    pub flag: Option<&'static str>,
}

impl FactorScore {
    pub fn new(points: u32, flag: Option<&'static str>) -> Self {
        FactorScore { points, flag }
    }
}
