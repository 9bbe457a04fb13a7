use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::providers::polygon::PolygonClient;
use crate::screener::{ScreenReport, Screener, ScreeningResult};

pub async fn run(config: Config) -> Result<()> {
    info!("🦈 Calendar-spread screener started");
    info!("================================");
    info!("Tickers: {:?}", config.screen.tickers);

    let client = PolygonClient::new(&config.api_key, config.screen.retry.clone());
    let screener = Screener::new(config.screen, client);

    let report = screener.run().await?;
    render(&report);

    Ok(())
}

fn render(report: &ScreenReport) {
    if !report.rejections.is_empty() {
        info!("{} candidates rejected", report.rejections.len());
    }

    if report.spreads.is_empty() {
        println!("\nNo calendar spreads matching the criteria were found.");
        return;
    }

    println!("\n--- Potential Calendar Spread Opportunities ---");
    println!(
        "{:<6} {:>10} {:>8} {:<6} {:>11} {:>11} {:>8} {:>9} {:>8} {:>8} {:>8}",
        "Ticker",
        "Price",
        "Strike",
        "Type",
        "Near Exp",
        "Far Exp",
        "Credit",
        "Theta",
        "IV Diff",
        "Near IV",
        "Far IV"
    );
    for spread in &report.spreads {
        println!("{}", row(spread));
    }
}

fn row(s: &ScreeningResult) -> String {
    format!(
        "{:<6} {:>10.2} {:>8} {:<6} {:>11} {:>11} {:>8} {:>9.4} {:>8.4} {:>8.2} {:>8.2}",
        s.ticker,
        s.stock_price,
        s.strike,
        s.contract_type.as_str(),
        s.near_expiry,
        s.far_expiry,
        s.net_credit_display,
        s.net_theta,
        s.iv_diff,
        s.near_iv,
        s.far_iv
    )
}
