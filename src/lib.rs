pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod providers;
pub mod screener;
pub mod utils;

pub use config::{Config, ScreenConfig};
pub use error::{Error, Result};
