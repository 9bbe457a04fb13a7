use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Listed option contract side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Call,
    Put,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Call => "call",
            ContractType::Put => "put",
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct LastTradeResponse {
    #[serde(default)]
    pub results: Option<LastTrade>,
}

#[derive(Debug, Deserialize)]
pub struct LastTrade {
    /// Last traded price.
    #[serde(default)]
    pub p: Option<f64>,
}

/// Full option-chain snapshot for one underlying. The provider
/// occasionally omits whole nested groups; every field is defaulted so
/// a sparse payload still deserializes.
#[derive(Debug, Default, Deserialize)]
pub struct OptionChainSnapshot {
    #[serde(default)]
    pub tickers: Vec<OptionContractRecord>,
}

impl OptionChainSnapshot {
    /// Distinct strikes listed in the snapshot, in arbitrary order.
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self
            .tickers
            .iter()
            .filter_map(|c| c.details.as_ref().and_then(|d| d.strike_price))
            .collect();
        strikes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        strikes.dedup();
        strikes
    }

    /// Underlying reference price embedded in the snapshot, if any
    /// record carries a non-zero one.
    pub fn embedded_underlying_price(&self) -> Option<f64> {
        self.tickers
            .iter()
            .filter_map(|c| c.underlying_asset.as_ref().and_then(|u| u.price))
            .find(|p| *p > 0.0)
    }

    /// Find the contract at `strike` for `contract_type` expiring on
    /// `expiry`, if listed.
    pub fn contract_at(
        &self,
        strike: f64,
        contract_type: ContractType,
        expiry: NaiveDate,
    ) -> Option<&OptionContractRecord> {
        self.tickers.iter().find(|c| {
            c.details.as_ref().is_some_and(|d| {
                d.strike_price == Some(strike)
                    && d.contract_type == Some(contract_type)
                    && d.expiration_date == Some(expiry)
            })
        })
    }
}

/// Raw provider record for one listed contract. Immutable once fetched;
/// downstream code reads it through `LegData::extract`.
#[derive(Debug, Default, Deserialize)]
pub struct OptionContractRecord {
    #[serde(default)]
    pub details: Option<ContractDetails>,
    #[serde(default)]
    pub last_quote: Option<ContractQuote>,
    #[serde(default)]
    pub greeks: Option<ContractGreeks>,
    #[serde(default)]
    pub day: Option<DayActivity>,
    #[serde(default)]
    pub open_interest: Option<i64>,
    #[serde(default)]
    pub underlying_asset: Option<UnderlyingAsset>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContractDetails {
    #[serde(default)]
    pub strike_price: Option<f64>,
    #[serde(default)]
    pub contract_type: Option<ContractType>,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub ticker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContractQuote {
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
    #[serde(default)]
    pub midpoint: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContractGreeks {
    #[serde(default)]
    pub implied_volatility: Option<f64>,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
    #[serde(default)]
    pub theta: Option<f64>,
    #[serde(default)]
    pub vega: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DayActivity {
    #[serde(default)]
    pub volume: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnderlyingAsset {
    #[serde(default)]
    pub price: Option<f64>,
}
