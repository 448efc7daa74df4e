use crate::domain::entities::region::Region;
use crate::domain::services::value_screen::ValueScreenConfig;

/// Configuration for a scan run: which symbols to cover, how hard to push
/// the data service, and where the score cut sits.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Per-region symbol lists, in scan order. A symbol listed by several
    /// regions is scanned once, under the first region that names it.
    pub universe: Vec<(Region, Vec<String>)>,
    /// Concurrent per-symbol fetches.
    pub max_workers: usize,
    /// Minimum daily bars before a symbol is scored at all.
    pub min_bars: usize,
    /// Breakout candidates below this score are logged but not saved.
    pub min_score_to_save: u32,
    /// Shared outbound budget against the data service.
    pub requests_per_minute: u32,
    pub breakout_output: String,
    pub value_output: String,
    pub value_screen: ValueScreenConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            universe: default_universe(),
            max_workers: 15,
            min_bars: 150,
            min_score_to_save: 80,
            requests_per_minute: 120,
            breakout_output: "breakout_scan.csv".to_string(),
            value_output: "global_watchlist.csv".to_string(),
            value_screen: ValueScreenConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> ScanConfig {
        let mut config = ScanConfig::default();

        if let Ok(workers) = std::env::var("SCAN_MAX_WORKERS") {
            match workers.parse::<usize>() {
                Ok(value) if value > 0 => config.max_workers = value,
                _ => tracing::warn!(
                    "Invalid SCAN_MAX_WORKERS value: {}, using default: {}",
                    workers,
                    config.max_workers
                ),
            }
        }

        if let Ok(bars) = std::env::var("SCAN_MIN_BARS") {
            match bars.parse::<usize>() {
                Ok(value) if value > 0 => config.min_bars = value,
                _ => tracing::warn!(
                    "Invalid SCAN_MIN_BARS value: {}, using default: {}",
                    bars,
                    config.min_bars
                ),
            }
        }

        if let Ok(score) = std::env::var("SCAN_MIN_SCORE") {
            match score.parse::<u32>() {
                Ok(value) if value <= 100 => config.min_score_to_save = value,
                _ => tracing::warn!(
                    "Invalid SCAN_MIN_SCORE value: {} (must be 0-100), using default: {}",
                    score,
                    config.min_score_to_save
                ),
            }
        }

        if let Ok(rpm) = std::env::var("SCAN_REQUESTS_PER_MINUTE") {
            match rpm.parse::<u32>() {
                Ok(value) if value > 0 => config.requests_per_minute = value,
                _ => tracing::warn!(
                    "Invalid SCAN_REQUESTS_PER_MINUTE value: {}, using default: {}",
                    rpm,
                    config.requests_per_minute
                ),
            }
        }

        config
    }
}

fn to_strings(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

/// Default universe: the high-beta US watchlist, DAX 40, EURO STOXX 50 and an
/// Asian tech/EV selection. Index membership drifts; these lists are plain
/// data and can be swapped out via a symbols file.
fn default_universe() -> Vec<(Region, Vec<String>)> {
    let us = [
        "AAPL", "MSFT", "NVDA", "AMZN", "META", "GOOGL", "TSLA", "PLTR", "NET", "SNOW", "UBER",
        "CELH", "ELF", "ONON", "IOT", "AVAV", "APP", "ARM", "SHOP", "MSTR", "COIN", "RIOT",
        "MARA",
    ];
    let de = [
        "ADS.DE", "AIR.DE", "ALV.DE", "BAS.DE", "BAYN.DE", "BEI.DE", "BMW.DE", "BNR.DE",
        "CBK.DE", "CON.DE", "1COV.DE", "DTG.DE", "DBK.DE", "DB1.DE", "DHL.DE", "DTE.DE",
        "EOAN.DE", "FRE.DE", "HNR1.DE", "HEI.DE", "HEN3.DE", "IFX.DE", "MBG.DE", "MRK.DE",
        "MTX.DE", "MUV2.DE", "PUM.DE", "QIA.DE", "RWE.DE", "SAP.DE", "SRT3.DE", "SIE.DE",
        "ENR.DE", "SY1.DE", "VOW3.DE", "VNA.DE", "ZAL.DE", "SHL.DE", "HLAG.DE", "RHM.DE",
    ];
    let eu = [
        "ASML.AS", "MC.PA", "SAP.DE", "PRX.AS", "SIE.DE", "TTE.PA", "SAN.MC", "OR.PA",
        "ALV.DE", "AIR.PA", "IBE.MC", "RMS.PA", "SU.PA", "AI.PA", "DTE.DE", "BNP.PA",
        "ABI.BR", "ITX.MC", "VOW3.DE", "BAYN.DE", "BMW.DE", "INGA.AS", "BAS.DE", "MBG.DE",
        "KER.PA", "AD.AS", "CS.PA", "SAF.PA", "MUV2.DE", "ENEL.MI", "ISP.MI", "ENI.MI",
        "STLAM.MI", "RACE.MI", "ORA.PA", "DG.PA", "BN.PA", "CAP.PA", "NOKIA.HE", "AH.AS",
        "UNA.AS", "PHIA.AS", "HEIA.AS", "KNEBV.HE", "BBVA.MC", "CRH.L",
    ];
    let asia = [
        "9984.T", "6758.T", "7203.T", "6861.T", "7974.T", "005930.KS", "000660.KS", "035420.KS",
        "035720.KS", "0700.HK", "9988.HK", "3690.HK", "9618.HK", "1211.HK", "2318.HK", "TSM",
        "NIO", "LI", "XPEV",
    ];

    vec![
        (Region::Us, to_strings(&us)),
        (Region::De, to_strings(&de)),
        (Region::Eu, to_strings(&eu)),
        (Region::Asia, to_strings(&asia)),
    ]
}
