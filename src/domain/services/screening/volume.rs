use crate::domain::services::screening::FactorScore;

/// Scores volume confirmation from the relative volume of a snapshot that
/// already passed the volume gate.
pub trait VolumeScoreCalculator {
    fn calculate(&self, rvol: f64) -> FactorScore;
}

/// Tiered on how far volume runs above its 50-day average.
pub struct RelativeVolumeCalculator {
    pub strong_rvol: f64,
    pub elevated_rvol: f64,
    pub strong_points: u32,
    pub elevated_points: u32,
    pub base_points: u32,
}

impl Default for RelativeVolumeCalculator {
    fn default() -> Self {
        RelativeVolumeCalculator {
            strong_rvol: 2.0,
            elevated_rvol: 1.6,
            strong_points: 25,
            elevated_points: 18,
            base_points: 10,
        }
    }
}

impl VolumeScoreCalculator for RelativeVolumeCalculator {
    fn calculate(&self, rvol: f64) -> FactorScore {
        if rvol >= self.strong_rvol {
            FactorScore::new(self.strong_points, Some("Volume: RVol above 2.0"))
        } else if rvol >= self.elevated_rvol {
            FactorScore::new(self.elevated_points, Some("Volume: RVol above 1.6"))
        } else {
            FactorScore::new(self.base_points, None)
        }
    }
}
