pub mod client;
pub mod models;

pub use client::PolygonClient;
pub use models::{ContractType, OptionChainSnapshot, OptionContractRecord};
