use crate::domain::services::screening::FactorScore;

/// Scores volatility compression from the Bollinger band width.
pub trait VolatilityScoreCalculator {
    /// `bb_width` and `bbw_mean50` come from a snapshot that passed the
    /// compression gate; the 120-bar minimum may still be warming up.
    fn calculate(&self, bb_width: f64, bbw_mean50: f64, bbw_min120: Option<f64>) -> FactorScore;
}

/// Tiered squeeze detector: a band width at its 120-bar low is the VCP-style
/// squeeze, well under the 50-bar mean is a narrow squeeze, anything else
/// that passed the gate is mildly compressed.
pub struct SqueezeVolatilityCalculator {
    /// Multiple of the 120-bar minimum still counted as "at the low".
    pub squeeze_tolerance: f64,
    /// Fraction of the 50-bar mean under which the squeeze is "narrow".
    pub narrow_ratio: f64,
    pub squeeze_points: u32,
    pub narrow_points: u32,
    pub base_points: u32,
}

impl Default for SqueezeVolatilityCalculator {
    fn default() -> Self {
        SqueezeVolatilityCalculator {
            squeeze_tolerance: 1.2,
            narrow_ratio: 0.8,
            squeeze_points: 20,
            narrow_points: 15,
            base_points: 8,
        }
    }
}

impl VolatilityScoreCalculator for SqueezeVolatilityCalculator {
    fn calculate(&self, bb_width: f64, bbw_mean50: f64, bbw_min120: Option<f64>) -> FactorScore {
        if let Some(min120) = bbw_min120 {
            if bb_width <= min120 * self.squeeze_tolerance {
                return FactorScore::new(
                    self.squeeze_points,
                    Some("Volatility: tight squeeze (VCP proxy)"),
                );
            }
        }
        if bb_width < bbw_mean50 * self.narrow_ratio {
            FactorScore::new(self.narrow_points, Some("Volatility: narrow squeeze"))
        } else {
            FactorScore::new(self.base_points, Some("Volatility: mildly compressed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_at_120_bar_low_is_tight_squeeze() {
        let calc = SqueezeVolatilityCalculator::default();
        let score = calc.calculate(0.044, 0.08, Some(0.04));
        assert_eq!(score.points, 20);
        assert_eq!(score.flag, Some("Volatility: tight squeeze (VCP proxy)"));
    }

    #[test]
    fn test_width_under_mean_is_narrow_squeeze() {
        let calc = SqueezeVolatilityCalculator::default();
        // 0.06 > 0.04 * 1.2 but < 0.08 * 0.8
        let score = calc.calculate(0.06, 0.08, Some(0.04));
        assert_eq!(score.points, 15);
        assert_eq!(score.flag, Some("Volatility: narrow squeeze"));
    }

    #[test]
    fn test_width_just_under_mean_is_base_tier() {
        let calc = SqueezeVolatilityCalculator::default();
        let score = calc.calculate(0.075, 0.08, Some(0.04));
        assert_eq!(score.points, 8);
        assert_eq!(score.flag, Some("Volatility: mildly compressed"));
    }

    #[test]
    fn test_missing_120_bar_minimum_falls_through() {
        let calc = SqueezeVolatilityCalculator::default();
        let score = calc.calculate(0.05, 0.08, None);
        assert_eq!(score.points, 15);
    }
}
