use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use stockscan::application::services::scan_service::ScanService;
use stockscan::config::ScanConfig;
use stockscan::domain::entities::fundamentals::FundamentalSnapshot;
use stockscan::domain::entities::region::Region;
use stockscan::domain::repositories::market_data::{
    HistoryRange, MarketDataError, MarketDataProvider, MarketDataResult,
};
use stockscan::domain::services::indicators::Candle;
use stockscan::persistence::watchlist;

struct MockProvider {
    fundamentals: HashMap<String, FundamentalSnapshot>,
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn daily_history(
        &self,
        symbol: &str,
        _range: HistoryRange,
    ) -> MarketDataResult<Vec<Candle>> {
        Err(MarketDataError::NoData(symbol.to_string()))
    }

    async fn fundamentals(&self, symbol: &str) -> MarketDataResult<FundamentalSnapshot> {
        self.fundamentals
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))
    }
}

fn healthy_snapshot() -> FundamentalSnapshot {
    FundamentalSnapshot {
        current_price: Some(120.0),
        two_hundred_day_average: Some(110.0),
        trailing_pe: Some(18.0),
        peg_ratio: Some(1.1),
        revenue_growth: Some(0.08),
        debt_to_equity: Some(60.0),
        trailing_eps: Some(6.5),
        free_cash_flow: Some(2_500_000_000.0),
        short_name: Some("Healthy Corp".to_string()),
    }
}

fn scan_config(universe: Vec<(Region, Vec<String>)>) -> ScanConfig {
    ScanConfig {
        universe,
        ..ScanConfig::default()
    }
}

#[tokio::test]
async fn test_end_to_end_value_scan_workflow() {
    let mut fundamentals = HashMap::new();
    fundamentals.insert("CHEAP-PEG".to_string(), healthy_snapshot());

    // No PEG published, but the raw PE is low enough for the fallback
    fundamentals.insert(
        "CHEAP-PE".to_string(),
        FundamentalSnapshot {
            peg_ratio: None,
            trailing_pe: Some(12.4),
            ..healthy_snapshot()
        },
    );

    // Over-levered balance sheet, must be rejected
    fundamentals.insert(
        "DEBT".to_string(),
        FundamentalSnapshot {
            debt_to_equity: Some(450.0),
            ..healthy_snapshot()
        },
    );

    // Trading below its 200-day average, must be rejected
    fundamentals.insert(
        "KNIFE".to_string(),
        FundamentalSnapshot {
            current_price: Some(90.0),
            ..healthy_snapshot()
        },
    );

    let config = scan_config(vec![
        (
            Region::Us,
            vec![
                "CHEAP-PEG".to_string(),
                "DEBT".to_string(),
                "KNIFE".to_string(),
                "GONE".to_string(),
            ],
        ),
        (Region::De, vec!["CHEAP-PE".to_string()]),
    ]);
    let service = ScanService::new(Arc::new(MockProvider { fundamentals }), config);

    let picks = service.run_value_scan().await.unwrap();
    assert_eq!(picks.len(), 2);

    // Ranked by region name, then symbol: DE rows precede US rows
    assert_eq!(picks[0].region, Region::De);
    assert_eq!(picks[0].symbol, "CHEAP-PE");
    assert!(picks[0].reason.contains("no PEG"));

    assert_eq!(picks[1].region, Region::Us);
    assert_eq!(picks[1].symbol, "CHEAP-PEG");
    assert_eq!(picks[1].name, "Healthy Corp");
    assert!(picks[1].reason.starts_with("PEG"));
}

#[tokio::test]
async fn test_value_watchlist_csv_roundtrip() {
    let mut fundamentals = HashMap::new();
    fundamentals.insert("CHEAP-PEG".to_string(), healthy_snapshot());

    let config = scan_config(vec![(Region::Us, vec!["CHEAP-PEG".to_string()])]);
    let service = ScanService::new(Arc::new(MockProvider { fundamentals }), config);
    let picks = service.run_value_scan().await.unwrap();
    assert_eq!(picks.len(), 1);

    let dir = std::env::temp_dir().join("stockscan_e2e_value_csv");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("global_watchlist.csv");

    watchlist::save_value_watchlist(&path, &picks).unwrap();
    let rows = watchlist::load_value_watchlist(&path).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].symbol, "CHEAP-PEG");
    assert_eq!(rows[0].name, "Healthy Corp");
    assert_eq!(rows[0].reason, picks[0].reason);

    std::fs::remove_dir_all(&dir).unwrap();
}
