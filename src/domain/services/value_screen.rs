use tracing::debug;

use crate::domain::entities::fundamentals::FundamentalSnapshot;

/// Thresholds for the fundamentals-based value screen.
///
/// Defaults are deliberately forgiving on growth (mildly negative revenue
/// growth is tolerated) and strict on profitability and debt.
#[derive(Debug, Clone)]
pub struct ValueScreenConfig {
    /// Reject when price sits below the 200-day average (no falling knives).
    pub check_trend: bool,
    pub min_eps: f64,
    pub check_free_cash_flow: bool,
    pub max_debt_to_equity: f64,
    pub min_revenue_growth: f64,
    pub max_peg_ratio: f64,
    /// Graham-style PE fallback when no PEG is published.
    pub max_pe_ratio: f64,
}

impl Default for ValueScreenConfig {
    fn default() -> Self {
        ValueScreenConfig {
            check_trend: true,
            min_eps: 0.0,
            check_free_cash_flow: true,
            max_debt_to_equity: 200.0,
            min_revenue_growth: -0.05,
            max_peg_ratio: 1.5,
            max_pe_ratio: 16.0,
        }
    }
}

/// Outcome of a passed value screen: the price that cleared it and the
/// valuation rule that admitted the symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueVerdict {
    pub price: f64,
    pub reason: String,
}

/// Fundamentals filter: trend, profitability, cash flow, debt, growth, then
/// valuation. Any missing figure a check needs rejects the symbol.
pub struct ValueScreen {
    config: ValueScreenConfig,
}

impl Default for ValueScreen {
    fn default() -> Self {
        ValueScreen {
            config: ValueScreenConfig::default(),
        }
    }
}

impl ValueScreen {
    pub fn new(config: ValueScreenConfig) -> Self {
        ValueScreen { config }
    }

    pub fn evaluate(&self, symbol: &str, snapshot: &FundamentalSnapshot) -> Option<ValueVerdict> {
        let price = snapshot.current_price?;

        if self.config.check_trend {
            if let Some(sma200) = snapshot.two_hundred_day_average {
                if price < sma200 {
                    debug!(symbol = %symbol, price = price, sma200 = sma200, "Below 200-day average");
                    return None;
                }
            }
        }

        match snapshot.trailing_eps {
            Some(eps) if eps > self.config.min_eps => {}
            _ => {
                debug!(symbol = %symbol, "Not profitable");
                return None;
            }
        }

        if self.config.check_free_cash_flow {
            match snapshot.free_cash_flow {
                Some(fcf) if fcf > 0.0 => {}
                _ => {
                    debug!(symbol = %symbol, "No positive free cash flow");
                    return None;
                }
            }
        }

        match snapshot.debt_to_equity {
            Some(debt) if debt <= self.config.max_debt_to_equity => {}
            _ => {
                debug!(symbol = %symbol, "Debt too high or unknown");
                return None;
            }
        }

        match snapshot.revenue_growth {
            Some(growth) if growth >= self.config.min_revenue_growth => {}
            _ => {
                debug!(symbol = %symbol, "Shrinking revenue or unknown growth");
                return None;
            }
        }

        let reason = match (snapshot.peg_ratio, snapshot.trailing_pe) {
            (Some(peg), _) if peg <= self.config.max_peg_ratio => format!("PEG {}", peg),
            (_, Some(pe)) if pe < self.config.max_pe_ratio => format!("PE {} (no PEG)", pe),
            _ => {
                debug!(symbol = %symbol, "Not undervalued");
                return None;
            }
        };

        Some(ValueVerdict { price, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_snapshot() -> FundamentalSnapshot {
        FundamentalSnapshot {
            current_price: Some(120.0),
            two_hundred_day_average: Some(110.0),
            trailing_pe: Some(14.0),
            peg_ratio: Some(1.2),
            revenue_growth: Some(0.08),
            debt_to_equity: Some(80.0),
            trailing_eps: Some(5.5),
            free_cash_flow: Some(1_000_000.0),
            short_name: Some("Test Corp".to_string()),
        }
    }

    #[test]
    fn test_healthy_company_passes_on_peg() {
        let screen = ValueScreen::default();
        let verdict = screen.evaluate("TEST", &healthy_snapshot()).unwrap();
        assert_eq!(verdict.price, 120.0);
        assert_eq!(verdict.reason, "PEG 1.2");
    }

    #[test]
    fn test_missing_price_rejects() {
        let screen = ValueScreen::default();
        let mut snapshot = healthy_snapshot();
        snapshot.current_price = None;
        assert!(screen.evaluate("TEST", &snapshot).is_none());
    }

    #[test]
    fn test_below_200_day_average_rejects() {
        let screen = ValueScreen::default();
        let mut snapshot = healthy_snapshot();
        snapshot.current_price = Some(100.0);
        snapshot.two_hundred_day_average = Some(110.0);
        assert!(screen.evaluate("TEST", &snapshot).is_none());
    }

    #[test]
    fn test_trend_check_skipped_without_average() {
        let screen = ValueScreen::default();
        let mut snapshot = healthy_snapshot();
        snapshot.two_hundred_day_average = None;
        assert!(screen.evaluate("TEST", &snapshot).is_some());
    }

    #[test]
    fn test_trend_check_can_be_disabled() {
        let screen = ValueScreen::new(ValueScreenConfig {
            check_trend: false,
            ..ValueScreenConfig::default()
        });
        let mut snapshot = healthy_snapshot();
        snapshot.current_price = Some(100.0);
        snapshot.two_hundred_day_average = Some(110.0);
        assert!(screen.evaluate("TEST", &snapshot).is_some());
    }

    #[test]
    fn test_unprofitable_rejects() {
        let screen = ValueScreen::default();
        let mut snapshot = healthy_snapshot();
        snapshot.trailing_eps = Some(-0.2);
        assert!(screen.evaluate("TEST", &snapshot).is_none());
        snapshot.trailing_eps = None;
        assert!(screen.evaluate("TEST", &snapshot).is_none());
    }

    #[test]
    fn test_negative_free_cash_flow_rejects() {
        let screen = ValueScreen::default();
        let mut snapshot = healthy_snapshot();
        snapshot.free_cash_flow = Some(-500.0);
        assert!(screen.evaluate("TEST", &snapshot).is_none());
    }

    #[test]
    fn test_overindebted_rejects() {
        let screen = ValueScreen::default();
        let mut snapshot = healthy_snapshot();
        snapshot.debt_to_equity = Some(250.0);
        assert!(screen.evaluate("TEST", &snapshot).is_none());
    }

    #[test]
    fn test_shrinking_revenue_rejects() {
        let screen = ValueScreen::default();
        let mut snapshot = healthy_snapshot();
        snapshot.revenue_growth = Some(-0.10);
        assert!(screen.evaluate("TEST", &snapshot).is_none());
    }

    #[test]
    fn test_pe_fallback_when_peg_missing() {
        let screen = ValueScreen::default();
        let mut snapshot = healthy_snapshot();
        snapshot.peg_ratio = None;
        let verdict = screen.evaluate("TEST", &snapshot).unwrap();
        assert_eq!(verdict.reason, "PE 14 (no PEG)");
    }

    #[test]
    fn test_expensive_on_both_metrics_rejects() {
        let screen = ValueScreen::default();
        let mut snapshot = healthy_snapshot();
        snapshot.peg_ratio = Some(3.0);
        snapshot.trailing_pe = Some(40.0);
        assert!(screen.evaluate("TEST", &snapshot).is_none());
    }
}
