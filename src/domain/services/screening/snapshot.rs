use crate::domain::services::indicators::{
    closes, relative_volume, rolling_over_options, volumes, BollingerWidth, Candle, Ema,
    Indicator, RollingMax, Rsi, Sma,
};

/// Last-bar indicator values the breakout scorer works from.
///
/// Core trend/momentum values are plain `f64` (a snapshot is only produced
/// when they exist); the volatility/volume/pattern inputs stay optional and
/// are checked by the gates.
#[derive(Debug, Clone)]
pub struct BreakoutSnapshot {
    pub close: f64,
    pub ema10: f64,
    pub ema20: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub rsi14: f64,
    pub bb_width: Option<f64>,
    /// 50-bar rolling mean of the band width.
    pub bbw_mean50: Option<f64>,
    /// 120-bar rolling min of the band width (at least 50 observations).
    pub bbw_min120: Option<f64>,
    /// Volume over its 50-day average.
    pub rvol: Option<f64>,
    /// 252-bar rolling max of the close (at least 50 observations).
    pub high_252: Option<f64>,
}

impl BreakoutSnapshot {
    /// Build the snapshot from a daily candle series.
    ///
    /// Returns `None` when the series is shorter than `min_bars` or any core
    /// value (EMAs, SMAs, RSI) is still inside its warm-up window.
    pub fn from_candles(candles: &[Candle], min_bars: usize) -> Option<Self> {
        if candles.len() < min_bars {
            return None;
        }

        let close_series = closes(candles);
        let volume_series = volumes(candles);
        let last = close_series.len() - 1;

        let ema10 = Ema::new(10).compute(&close_series)[last]?;
        let ema20 = Ema::new(20).compute(&close_series)[last]?;
        let sma50 = Sma::new(50).compute(&close_series)[last]?;
        let sma200 = Sma::new(200).compute(&close_series)[last]?;
        let rsi14 = Rsi::new(14).compute(&close_series)[last]?;

        let bb_series = BollingerWidth::new(20, 2.0).compute(&close_series);
        let bb_width = bb_series[last];
        let bbw_mean50 = rolling_over_options(&bb_series, 50, 50, |w| {
            w.iter().sum::<f64>() / w.len() as f64
        })[last];
        let bbw_min120 = rolling_over_options(&bb_series, 120, 50, |w| {
            w.iter().copied().fold(f64::INFINITY, f64::min)
        })[last];

        let rvol = relative_volume(&volume_series, 50)[last];
        let high_252 = RollingMax {
            window: 252,
            min_periods: 50,
        }
        .compute(&close_series)[last];

        Some(BreakoutSnapshot {
            close: close_series[last],
            ema10,
            ema20,
            sma50,
            sma200,
            rsi14,
            bb_width,
            bbw_mean50,
            bbw_min120,
            rvol,
            high_252,
        })
    }
}
