use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockscan::application::services::scan_service::ScanService;
use stockscan::config::ScanConfig;
use stockscan::domain::entities::region::Region;
use stockscan::domain::errors::ScanError;
use stockscan::infrastructure::yahoo_client::{YahooConfig, YahooFinanceClient};
use stockscan::persistence::watchlist;

#[derive(Parser)]
#[command(name = "stockscan")]
#[command(about = "Scans ticker universes for breakout setups and value picks")]
struct Cli {
    /// Newline-delimited `REGION,SYMBOL` file replacing the built-in universe
    #[arg(long, global = true)]
    symbols_file: Option<PathBuf>,

    /// Watchlist output path (default depends on the subcommand)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Concurrent per-symbol fetches
    #[arg(long, global = true)]
    max_workers: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan for breakout candidates and write the breakout watchlist
    Breakout {
        /// Minimum score a candidate needs to be saved (0-100)
        #[arg(long)]
        min_score: Option<u32>,
    },
    /// Run the fundamentals value screen and write the value watchlist
    Value,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockscan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = ScanConfig::from_env();

    if let Some(path) = &cli.symbols_file {
        config.universe = load_universe_file(path)?;
        info!(path = %path.display(), regions = config.universe.len(), "Loaded universe file");
    }
    if let Some(workers) = cli.max_workers {
        config.max_workers = workers.max(1);
    }

    let client = YahooFinanceClient::new(YahooConfig {
        requests_per_minute: config.requests_per_minute,
        ..YahooConfig::default()
    })?;

    match cli.command {
        Command::Breakout { min_score } => {
            if let Some(score) = min_score {
                config.min_score_to_save = score.min(100);
            }
            let output = cli
                .output
                .unwrap_or_else(|| PathBuf::from(&config.breakout_output));
            let service = ScanService::new(Arc::new(client), config);
            run_breakout(&service, &output).await?;
        }
        Command::Value => {
            let output = cli
                .output
                .unwrap_or_else(|| PathBuf::from(&config.value_output));
            let service = ScanService::new(Arc::new(client), config);
            run_value(&service, &output).await?;
        }
    }

    Ok(())
}

async fn run_breakout(
    service: &ScanService<YahooFinanceClient>,
    output: &Path,
) -> Result<(), ScanError> {
    let results = service.run_breakout_scan().await?;
    if results.is_empty() {
        warn!("No symbol produced usable data");
        return Ok(());
    }

    let saved = service.saveable(&results);
    if saved.is_empty() {
        warn!(
            min_score = service.config().min_score_to_save,
            "No candidate cleared the score cut"
        );
        for candidate in results.iter().take(10) {
            info!(
                region = %candidate.region,
                symbol = %candidate.symbol,
                score = candidate.score,
                rsi14 = candidate.rsi14,
                rvol = candidate.rvol,
                flags = %candidate.flags,
                "Top candidate below cut"
            );
        }
        return Ok(());
    }

    watchlist::save_breakout_watchlist(output, &saved)?;
    info!(
        candidates = saved.len(),
        path = %output.display(),
        "Breakout candidates saved"
    );
    Ok(())
}

async fn run_value(
    service: &ScanService<YahooFinanceClient>,
    output: &Path,
) -> Result<(), ScanError> {
    let picks = service.run_value_scan().await?;
    if picks.is_empty() {
        warn!("No symbol passed the value screen");
        return Ok(());
    }

    watchlist::save_value_watchlist(output, &picks)?;
    info!(picks = picks.len(), path = %output.display(), "Value picks saved");
    Ok(())
}

/// Parse a `REGION,SYMBOL` per line universe file. Blank lines and lines
/// starting with `#` are ignored; region order follows first appearance.
fn load_universe_file(path: &Path) -> Result<Vec<(Region, Vec<String>)>, ScanError> {
    let contents = std::fs::read_to_string(path)?;
    let mut universe: Vec<(Region, Vec<String>)> = Vec::new();

    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (region_str, symbol) = line.split_once(',').ok_or_else(|| {
            ScanError::InvalidConfiguration(format!(
                "{}:{}: expected REGION,SYMBOL",
                path.display(),
                line_no + 1
            ))
        })?;
        let region = Region::from_str(region_str).map_err(|e| {
            ScanError::InvalidConfiguration(format!("{}:{}: {}", path.display(), line_no + 1, e))
        })?;
        let symbol = symbol.trim().to_string();
        if symbol.is_empty() {
            return Err(ScanError::InvalidConfiguration(format!(
                "{}:{}: empty symbol",
                path.display(),
                line_no + 1
            )));
        }

        match universe.iter_mut().find(|(r, _)| *r == region) {
            Some((_, symbols)) => symbols.push(symbol),
            None => universe.push((region, vec![symbol])),
        }
    }

    if universe.is_empty() {
        return Err(ScanError::InvalidConfiguration(format!(
            "{}: no symbols found",
            path.display()
        )));
    }
    Ok(universe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("stockscan_test_universe");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_universe_file_groups_by_region() {
        let path = write_temp(
            "grouped.txt",
            "# comment\nUS,AAPL\nDE,SAP.DE\nUS,NVDA\n\nASIA,TSM\n",
        );
        let universe = load_universe_file(&path).unwrap();
        assert_eq!(universe.len(), 3);
        assert_eq!(universe[0].0, Region::Us);
        assert_eq!(universe[0].1, vec!["AAPL".to_string(), "NVDA".to_string()]);
        assert_eq!(universe[2].0, Region::Asia);
    }

    #[test]
    fn test_load_universe_file_rejects_bad_region() {
        let path = write_temp("bad_region.txt", "MOON,DOGE\n");
        assert!(load_universe_file(&path).is_err());
    }

    #[test]
    fn test_load_universe_file_rejects_missing_comma() {
        let path = write_temp("no_comma.txt", "AAPL\n");
        assert!(load_universe_file(&path).is_err());
    }

    #[test]
    fn test_load_universe_file_rejects_empty_file() {
        let path = write_temp("empty.txt", "\n# only comments\n");
        assert!(load_universe_file(&path).is_err());
    }
}
