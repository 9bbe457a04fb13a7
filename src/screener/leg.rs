//! Normalization of raw contract records into flat leg data.

use chrono::NaiveDate;
use serde::Serialize;

use crate::providers::polygon::{ContractType, OptionContractRecord};

/// Fully-populated projection of one option contract. Numeric fields
/// default to zero when the provider omits a nested group; identity
/// fields are `None` only when the source record itself was absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LegData {
    pub bid: f64,
    pub ask: f64,
    pub mid: f64,
    pub iv: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub volume: i64,
    pub open_interest: i64,
    pub strike_price: Option<f64>,
    pub contract_type: Option<ContractType>,
    pub expiry_date: Option<NaiveDate>,
}

impl LegData {
    /// Flatten a raw record. Total: never fails, absent input yields
    /// the all-default leg.
    pub fn extract(record: Option<&OptionContractRecord>) -> Self {
        let record = match record {
            Some(record) => record,
            None => return Self::default(),
        };

        let quote = record.last_quote.as_ref();
        let greeks = record.greeks.as_ref();
        let details = record.details.as_ref();

        Self {
            bid: quote.and_then(|q| q.bid).unwrap_or(0.0),
            ask: quote.and_then(|q| q.ask).unwrap_or(0.0),
            mid: quote.and_then(|q| q.midpoint).unwrap_or(0.0),
            iv: greeks.and_then(|g| g.implied_volatility).unwrap_or(0.0),
            delta: greeks.and_then(|g| g.delta).unwrap_or(0.0),
            gamma: greeks.and_then(|g| g.gamma).unwrap_or(0.0),
            theta: greeks.and_then(|g| g.theta).unwrap_or(0.0),
            vega: greeks.and_then(|g| g.vega).unwrap_or(0.0),
            volume: record.day.as_ref().and_then(|d| d.volume).unwrap_or(0),
            open_interest: record.open_interest.unwrap_or(0),
            strike_price: details.and_then(|d| d.strike_price),
            contract_type: details.and_then(|d| d.contract_type),
            expiry_date: details.and_then(|d| d.expiration_date),
        }
    }
}
