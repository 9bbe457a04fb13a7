//! Calendar-spread screening pipeline.
//!
//! One pass over the configured universe: resolve the two nearest
//! weekly expiries, then for each (ticker, contract type) pair fetch
//! the chain snapshot, pick the ATM strike, extract both legs and run
//! the filter. Scan units are failure-isolated; only an unresolvable
//! expiry pair aborts the run.

pub mod evaluate;
pub mod expiry;
pub mod leg;
pub mod strike;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::ScreenConfig;
use crate::error::{Error, Result};
use crate::providers::polygon::{ContractType, OptionChainSnapshot, PolygonClient};

pub use evaluate::{evaluate, RejectReason, ScreeningResult, SpreadCandidate};
pub use leg::LegData;

/// Outcome of one screening pass: qualifying spreads ranked by net
/// credit, plus every structured rejection for observability.
#[derive(Debug)]
pub struct ScreenReport {
    pub spreads: Vec<ScreeningResult>,
    pub rejections: Vec<RejectReason>,
}

pub struct Screener {
    config: ScreenConfig,
    client: PolygonClient,
}

impl Screener {
    pub fn new(config: ScreenConfig, client: PolygonClient) -> Self {
        Self { config, client }
    }

    pub async fn run(&self) -> Result<ScreenReport> {
        self.run_from(chrono::Local::now().date_naive()).await
    }

    /// Run one screening pass using `reference` as "today".
    pub async fn run_from(&self, reference: NaiveDate) -> Result<ScreenReport> {
        let (near_expiry, far_expiry) = resolve_expiries(reference)?;
        info!(
            "Screening {} tickers for {} / {} calendars",
            self.config.tickers.len(),
            near_expiry,
            far_expiry
        );

        let mut spreads = Vec::new();
        let mut rejections = Vec::new();

        for ticker in &self.config.tickers {
            for &contract_type in &self.config.contract_types {
                match self
                    .scan_unit(ticker, contract_type, near_expiry, far_expiry)
                    .await
                {
                    Some(Ok(result)) => {
                        info!(
                            "{} {} @ {}: accepted, net credit {}",
                            ticker, contract_type, result.strike, result.net_credit_display
                        );
                        spreads.push(result);
                    }
                    Some(Err(reason)) => {
                        info!("rejected: {}", reason);
                        rejections.push(reason);
                    }
                    // Unit skipped before evaluation; already logged.
                    None => {}
                }
            }
        }

        rank(&mut spreads);
        Ok(ScreenReport {
            spreads,
            rejections,
        })
    }

    /// One failure-isolated scan: any missing piece skips this
    /// (ticker, contract type) pair with a diagnostic, never the run.
    async fn scan_unit(
        &self,
        ticker: &str,
        contract_type: ContractType,
        near_expiry: NaiveDate,
        far_expiry: NaiveDate,
    ) -> Option<std::result::Result<ScreeningResult, RejectReason>> {
        let snapshot = match self.client.option_chain_snapshot(ticker).await {
            Some(snapshot) => snapshot,
            None => {
                warn!("{} {}: no chain snapshot, skipping", ticker, contract_type);
                return None;
            }
        };

        let stock_price = match self.reference_price(ticker, &snapshot).await {
            Some(price) => price,
            None => {
                warn!("{} {}: no reference price, skipping", ticker, contract_type);
                return None;
            }
        };

        let strikes = snapshot.strikes();
        let strike = match strike::select_atm_strike(&strikes, stock_price, ticker) {
            Ok(strike) => strike,
            Err(e) => {
                warn!("{} {}: {}, skipping", ticker, contract_type, e);
                return None;
            }
        };
        info!(
            "{} {}: price {:.2}, ATM strike {}",
            ticker, contract_type, stock_price, strike
        );

        let near_record = snapshot.contract_at(strike, contract_type, near_expiry);
        let far_record = snapshot.contract_at(strike, contract_type, far_expiry);
        if near_record.is_none() || far_record.is_none() {
            warn!(
                "{} {}: no contract at strike {} for both {} and {}, skipping",
                ticker, contract_type, strike, near_expiry, far_expiry
            );
            return None;
        }

        let candidate = SpreadCandidate {
            ticker: ticker.to_string(),
            stock_price,
            strike,
            contract_type,
            near_expiry,
            far_expiry,
            near: LegData::extract(near_record),
            far: LegData::extract(far_record),
        };

        Some(evaluate(&candidate, &self.config))
    }

    /// Resolution order: price embedded in the snapshot when present
    /// and non-zero, else a last-trade lookup.
    async fn reference_price(&self, ticker: &str, snapshot: &OptionChainSnapshot) -> Option<f64> {
        if let Some(price) = snapshot.embedded_underlying_price() {
            return Some(price);
        }
        self.client.last_trade_price(ticker).await
    }
}

/// The two nearest distinct future Fridays, run-fatal when they cannot
/// be resolved.
pub fn resolve_expiries(reference: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let fridays = expiry::next_fridays(2, reference);
    match fridays.as_slice() {
        [near, far] if near != far => Ok((*near, *far)),
        other => Err(Error::InsufficientExpiries {
            needed: 2,
            resolved: other.len(),
        }),
    }
}

/// Stable descending sort by raw net credit; ties keep scan order.
pub fn rank(spreads: &mut [ScreeningResult]) {
    spreads.sort_by(|a, b| {
        b.net_credit
            .partial_cmp(&a.net_credit)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(ticker: &str, net_credit: f64) -> ScreeningResult {
        ScreeningResult {
            ticker: ticker.to_string(),
            stock_price: 100.0,
            strike: 100.0,
            contract_type: ContractType::Call,
            near_expiry: NaiveDate::from_ymd_opt(2026, 9, 4).unwrap(),
            far_expiry: NaiveDate::from_ymd_opt(2026, 9, 11).unwrap(),
            net_credit,
            net_credit_display: format!("${:.2}", net_credit),
            net_theta: 0.05,
            iv_diff: 0.08,
            near_iv: 0.30,
            far_iv: 0.22,
        }
    }

    #[test]
    fn ranks_by_net_credit_descending() {
        let mut spreads = vec![
            result("AAPL", 0.50),
            result("TSLA", 1.20),
            result("NVDA", 0.75),
        ];
        rank(&mut spreads);

        let credits: Vec<f64> = spreads.iter().map(|s| s.net_credit).collect();
        assert_eq!(credits, vec![1.20, 0.75, 0.50]);
    }

    #[test]
    fn ranking_ties_keep_scan_order() {
        let mut spreads = vec![
            result("AAPL", 0.50),
            result("TSLA", 0.50),
            result("NVDA", 1.00),
        ];
        rank(&mut spreads);

        assert_eq!(spreads[0].ticker, "NVDA");
        assert_eq!(spreads[1].ticker, "AAPL");
        assert_eq!(spreads[2].ticker, "TSLA");
    }

    #[test]
    fn expiries_resolve_to_two_distinct_fridays() {
        let reference = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let (near, far) = resolve_expiries(reference).unwrap();
        assert_eq!(near, NaiveDate::from_ymd_opt(2026, 8, 28).unwrap());
        assert_eq!(far, NaiveDate::from_ymd_opt(2026, 9, 4).unwrap());
    }
}
