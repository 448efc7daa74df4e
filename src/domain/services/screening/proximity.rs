use crate::domain::services::screening::FactorScore;

/// Scores how close the last close sits to the 52-week high.
pub trait ProximityScoreCalculator {
    /// `ratio` is close / 252-bar high, gate-checked to be at least 0.9.
    fn calculate(&self, ratio: f64) -> FactorScore;
}

/// Breakouts fire from the high itself; a base is still worth points when it
/// forms within a few percent of it.
pub struct HighProximityCalculator {
    pub at_high_ratio: f64,
    pub near_high_ratio: f64,
    pub at_high_points: u32,
    pub near_high_points: u32,
    pub base_points: u32,
}

impl Default for HighProximityCalculator {
    fn default() -> Self {
        HighProximityCalculator {
            at_high_ratio: 0.98,
            near_high_ratio: 0.95,
            at_high_points: 20,
            near_high_points: 15,
            base_points: 8,
        }
    }
}

impl ProximityScoreCalculator for HighProximityCalculator {
    fn calculate(&self, ratio: f64) -> FactorScore {
        if ratio >= self.at_high_ratio {
            FactorScore::new(self.at_high_points, Some("Pattern: at 52-week high"))
        } else if ratio >= self.near_high_ratio {
            FactorScore::new(self.near_high_points, Some("Pattern: near 52-week high"))
        } else {
            FactorScore::new(self.base_points, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_the_high() {
        let calc = HighProximityCalculator::default();
        let score = calc.calculate(1.0);
        assert_eq!(score.points, 20);
        assert_eq!(score.flag, Some("Pattern: at 52-week high"));
    }

    #[test]
    fn test_near_the_high() {
        let calc = HighProximityCalculator::default();
        assert_eq!(calc.calculate(0.96).points, 15);
    }

    #[test]
    fn test_base_band_above_gate() {
        let calc = HighProximityCalculator::default();
        let score = calc.calculate(0.92);
        assert_eq!(score.points, 8);
        assert_eq!(score.flag, None);
    }
}
