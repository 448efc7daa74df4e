use chrono::{DateTime, Utc};

use crate::domain::value_objects::price::Price;

/// One daily OHLCV bar. Series are ordered oldest to newest.
#[derive(Debug, Clone)]
pub struct Candle {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, String> {
        Ok(Candle {
            open: Price::new(open)?,
            high: Price::new(high)?,
            low: Price::new(low)?,
            close: Price::new(close)?,
            volume,
            timestamp,
        })
    }
}

pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close.value()).collect()
}

pub fn volumes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.volume).collect()
}

/// Rolling indicator over a value series.
///
/// Output is aligned 1:1 with the input: `None` until the window is filled,
/// so callers can tell "not enough history" apart from a real value.
pub trait Indicator {
    fn compute(&self, values: &[f64]) -> Vec<Option<f64>>;
}

pub struct Sma {
    pub period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Sma { period }
    }
}

impl Indicator for Sma {
    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        if self.period == 0 {
            return vec![None; values.len()];
        }
        let mut out = Vec::with_capacity(values.len());
        let mut sum = 0.0;
        for (i, &v) in values.iter().enumerate() {
            sum += v;
            if i >= self.period {
                sum -= values[i - self.period];
            }
            if i + 1 >= self.period {
                out.push(Some(sum / self.period as f64));
            } else {
                out.push(None);
            }
        }
        out
    }
}

pub struct Ema {
    pub period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Ema { period }
    }
}

impl Indicator for Ema {
    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        if self.period == 0 {
            return vec![None; values.len()];
        }
        let mut out = Vec::with_capacity(values.len());
        let multiplier = 2.0 / (self.period as f64 + 1.0);
        let mut ema: Option<f64> = None;
        let mut seed_sum = 0.0;
        for (i, &v) in values.iter().enumerate() {
            match ema {
                None => {
                    seed_sum += v;
                    if i + 1 == self.period {
                        // First EMA is the SMA of the seed window
                        ema = Some(seed_sum / self.period as f64);
                    }
                }
                Some(prev) => {
                    ema = Some((v - prev) * multiplier + prev);
                }
            }
            out.push(ema);
        }
        out
    }
}

/// Rolling-mean RSI: average gain / average loss over plain rolling means of
/// the one-step deltas (no Wilder smoothing). A window with no losses reads
/// exactly 100.
pub struct Rsi {
    pub period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Rsi { period }
    }
}

impl Indicator for Rsi {
    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        if self.period == 0 || values.len() <= self.period {
            return out;
        }
        for i in self.period..values.len() {
            let mut gain_sum = 0.0;
            let mut loss_sum = 0.0;
            for j in (i + 1 - self.period)..=i {
                let change = values[j] - values[j - 1];
                if change > 0.0 {
                    gain_sum += change;
                } else {
                    loss_sum += -change;
                }
            }
            let avg_gain = gain_sum / self.period as f64;
            let avg_loss = loss_sum / self.period as f64;
            let rsi = if avg_loss == 0.0 {
                100.0
            } else {
                let rs = avg_gain / avg_loss;
                100.0 - (100.0 / (1.0 + rs))
            };
            out[i] = Some(rsi);
        }
        out
    }
}

/// Normalized Bollinger band width: `(upper - lower) / close` with bands at
/// `ma ± std_dev * std`. Standard deviation is the sample one (ddof = 1).
pub struct BollingerWidth {
    pub period: usize,
    pub std_dev: f64,
}

impl BollingerWidth {
    pub fn new(period: usize, std_dev: f64) -> Self {
        BollingerWidth { period, std_dev }
    }
}

impl Indicator for BollingerWidth {
    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        if self.period < 2 {
            return out;
        }
        for i in (self.period - 1)..values.len() {
            let window = &values[(i + 1 - self.period)..=i];
            let mean = window.iter().sum::<f64>() / self.period as f64;
            let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (self.period - 1) as f64;
            let std = variance.sqrt();
            let close = values[i];
            if close > 0.0 {
                out[i] = Some(2.0 * self.std_dev * std / close);
            }
        }
        out
    }
}

/// Rolling mean over `window` values, produced once `min_periods` are present.
pub struct RollingMean {
    pub window: usize,
    pub min_periods: usize,
}

impl Indicator for RollingMean {
    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        rolling(values, self.window, self.min_periods, |w| {
            w.iter().sum::<f64>() / w.len() as f64
        })
    }
}

/// Rolling max over `window` values, produced once `min_periods` are present.
pub struct RollingMax {
    pub window: usize,
    pub min_periods: usize,
}

impl Indicator for RollingMax {
    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        rolling(values, self.window, self.min_periods, |w| {
            w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        })
    }
}

/// Rolling min over `window` values, produced once `min_periods` are present.
pub struct RollingMin {
    pub window: usize,
    pub min_periods: usize,
}

impl Indicator for RollingMin {
    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        rolling(values, self.window, self.min_periods, |w| {
            w.iter().copied().fold(f64::INFINITY, f64::min)
        })
    }
}

fn rolling<F>(values: &[f64], window: usize, min_periods: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![None; values.len()];
    if window == 0 || min_periods == 0 {
        return out;
    }
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        if slice.len() >= min_periods {
            out[i] = Some(f(slice));
        }
    }
    out
}

/// Rolling aggregate over a series that already has gaps. Only the present
/// values inside the window are aggregated, and at least `min_periods` of
/// them must be there (pandas' non-NaN counting).
pub fn rolling_over_options<F>(
    values: &[Option<f64>],
    window: usize,
    min_periods: usize,
    f: F,
) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![None; values.len()];
    if window == 0 || min_periods == 0 {
        return out;
    }
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let present: Vec<f64> = values[start..=i].iter().filter_map(|v| *v).collect();
        if present.len() >= min_periods {
            out[i] = Some(f(&present));
        }
    }
    out
}

/// Relative volume: current volume over its rolling mean. `None` until the
/// averaging window is filled.
pub fn relative_volume(volumes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mean = RollingMean {
        window,
        min_periods: window,
    }
    .compute(volumes);
    volumes
        .iter()
        .zip(mean)
        .map(|(&v, m)| match m {
            Some(avg) if avg > 0.0 => Some(v / avg),
            _ => None,
        })
        .collect()
}
