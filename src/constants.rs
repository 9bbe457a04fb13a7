//! Polygon.io REST endpoints

pub const POLYGON_REST_URL: &str = "https://api.polygon.io";

/// Last-trade lookup, v2: `/v2/last/trade/{ticker}`
pub const LAST_TRADE_PATH: &str = "/v2/last/trade";

/// Full option-chain snapshot, v2:
/// `/v2/snapshot/locale/us/markets/options/tickers/{ticker}`
pub const OPTION_CHAIN_PATH: &str = "/v2/snapshot/locale/us/markets/options/tickers";
