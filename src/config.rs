use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::providers::polygon::ContractType;
use crate::utils::retry::RetryPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub screen: ScreenConfig,
}

/// Parameters for one screening pass. Immutable for the duration of a
/// run; passed explicitly so parallel runs can use different knobs.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    pub tickers: Vec<String>,
    pub min_option_volume: i64,
    pub min_open_interest: i64,
    pub min_net_credit: f64,
    pub min_iv_premium: f64,
    pub require_positive_net_theta: bool,
    pub contract_types: Vec<ContractType>,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let api_key = std::env::var("POLYGON_API_KEY")
            .map_err(|_| Error::Config("POLYGON_API_KEY not set".into()))?;
        if api_key.is_empty() || api_key == "YOUR_API_KEY_HERE" {
            return Err(Error::Config(
                "POLYGON_API_KEY is a placeholder; set a real Polygon.io key".into(),
            ));
        }

        let mut screen = ScreenConfig::default();

        if let Ok(tickers) = std::env::var("SCREEN_TICKERS") {
            screen.tickers = tickers
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        screen.min_option_volume = env_parsed("MIN_OPTION_VOLUME", screen.min_option_volume)?;
        screen.min_open_interest = env_parsed("MIN_OPEN_INTEREST", screen.min_open_interest)?;
        screen.min_net_credit = env_parsed("MIN_NET_CREDIT", screen.min_net_credit)?;
        screen.min_iv_premium = env_parsed("MIN_IV_PREMIUM", screen.min_iv_premium)?;
        screen.require_positive_net_theta =
            env_parsed("REQUIRE_POSITIVE_NET_THETA", screen.require_positive_net_theta)?;

        if let Ok(selector) = std::env::var("CONTRACT_TYPES") {
            screen.contract_types = resolve_contract_types(&selector)?;
        }

        screen.retry = RetryPolicy {
            attempts: env_parsed("RETRY_ATTEMPTS", screen.retry.attempts)?,
            delay: Duration::from_millis(env_parsed(
                "RETRY_DELAY_MS",
                screen.retry.delay.as_millis() as u64,
            )?),
            backoff_factor: env_parsed("RETRY_BACKOFF_FACTOR", screen.retry.backoff_factor)?,
        };

        Ok(Config { api_key, screen })
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            tickers: ["AAPL", "TSLA", "NVDA", "QQQ", "SPY", "AMD"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_option_volume: 100,
            min_open_interest: 500,
            min_net_credit: 0.01,
            min_iv_premium: 0.00,
            require_positive_net_theta: true,
            contract_types: vec![ContractType::Call, ContractType::Put],
            retry: RetryPolicy::default(),
        }
    }
}

/// Resolve the single-value-or-"both" selector into an explicit set.
pub fn resolve_contract_types(selector: &str) -> Result<Vec<ContractType>> {
    match selector.trim().to_lowercase().as_str() {
        "call" => Ok(vec![ContractType::Call]),
        "put" => Ok(vec![ContractType::Put]),
        "both" => Ok(vec![ContractType::Call, ContractType::Put]),
        other => Err(Error::Config(format!(
            "CONTRACT_TYPES must be call, put or both, got {:?}",
            other
        ))),
    }
}

fn env_parsed<T: FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} has invalid value {:?}", key, raw))),
        Err(_) => Ok(default),
    }
}
