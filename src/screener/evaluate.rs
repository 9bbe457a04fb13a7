//! Calendar-spread evaluation.
//!
//! A candidate sells the near leg and buys the far leg at the same ATM
//! strike. Checks run cheapest-first and short-circuit: liquidity, net
//! credit, IV premium, net theta.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::leg::LegData;
use crate::config::ScreenConfig;
use crate::providers::polygon::ContractType;

/// One ATM pairing under evaluation. Transient; consumed by `evaluate`.
#[derive(Debug, Clone)]
pub struct SpreadCandidate {
    pub ticker: String,
    pub stock_price: f64,
    pub strike: f64,
    pub contract_type: ContractType,
    pub near_expiry: NaiveDate,
    pub far_expiry: NaiveDate,
    pub near: LegData,
    pub far: LegData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LegSide {
    Near,
    Far,
}

impl std::fmt::Display for LegSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LegSide::Near => "near",
            LegSide::Far => "far",
        })
    }
}

/// Why a candidate was rejected. Each variant carries the failing
/// metric and its threshold so callers can branch on kind instead of
/// parsing text; Display is the human-readable diagnostic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectReason {
    #[error(
        "{ticker} {contract_type} @ {strike}: {leg} leg illiquid \
         (volume {volume} < {min_volume} or open interest {open_interest} < {min_open_interest})"
    )]
    Liquidity {
        ticker: String,
        strike: f64,
        contract_type: ContractType,
        leg: LegSide,
        volume: i64,
        open_interest: i64,
        min_volume: i64,
        min_open_interest: i64,
    },

    #[error(
        "{ticker} {contract_type} @ {strike}: net credit {net_credit:.2} below {min_net_credit:.2}"
    )]
    Credit {
        ticker: String,
        strike: f64,
        contract_type: ContractType,
        net_credit: f64,
        min_net_credit: f64,
    },

    #[error(
        "{ticker} {contract_type} @ {strike}: IV premium {iv_diff:.4} below {min_iv_premium:.4} \
         (near {near_iv:.4}, far {far_iv:.4})"
    )]
    IvPremium {
        ticker: String,
        strike: f64,
        contract_type: ContractType,
        iv_diff: f64,
        near_iv: f64,
        far_iv: f64,
        min_iv_premium: f64,
    },

    #[error("{ticker} {contract_type} @ {strike}: net theta {net_theta:.4} not positive")]
    Theta {
        ticker: String,
        strike: f64,
        contract_type: ContractType,
        net_theta: f64,
    },
}

/// A spread that passed every filter.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningResult {
    pub ticker: String,
    pub stock_price: f64,
    pub strike: f64,
    pub contract_type: ContractType,
    pub near_expiry: NaiveDate,
    pub far_expiry: NaiveDate,
    /// Raw value, the sort key. The display string is not sortable.
    pub net_credit: f64,
    pub net_credit_display: String,
    pub net_theta: f64,
    pub iv_diff: f64,
    pub near_iv: f64,
    pub far_iv: f64,
}

pub fn evaluate(
    candidate: &SpreadCandidate,
    config: &ScreenConfig,
) -> std::result::Result<ScreeningResult, RejectReason> {
    let near = &candidate.near;
    let far = &candidate.far;

    // 1. Liquidity, both legs.
    for (leg, data) in [(LegSide::Near, near), (LegSide::Far, far)] {
        if data.volume < config.min_option_volume || data.open_interest < config.min_open_interest
        {
            return Err(RejectReason::Liquidity {
                ticker: candidate.ticker.clone(),
                strike: candidate.strike,
                contract_type: candidate.contract_type,
                leg,
                volume: data.volume,
                open_interest: data.open_interest,
                min_volume: config.min_option_volume,
                min_open_interest: config.min_open_interest,
            });
        }
    }

    // 2. Net credit: sell near at bid, buy far at ask.
    let net_credit = near.bid - far.ask;
    if net_credit < config.min_net_credit {
        return Err(RejectReason::Credit {
            ticker: candidate.ticker.clone(),
            strike: candidate.strike,
            contract_type: candidate.contract_type,
            net_credit,
            min_net_credit: config.min_net_credit,
        });
    }

    // 3. IV premium on the sold leg.
    let iv_diff = near.iv - far.iv;
    if iv_diff < config.min_iv_premium {
        return Err(RejectReason::IvPremium {
            ticker: candidate.ticker.clone(),
            strike: candidate.strike,
            contract_type: candidate.contract_type,
            iv_diff,
            near_iv: near.iv,
            far_iv: far.iv,
            min_iv_premium: config.min_iv_premium,
        });
    }

    // 4. Net theta. Selling the near leg flips the sign of its decay
    // contribution; the provider reports raw (long-position) theta.
    let net_theta = -near.theta + far.theta;
    if config.require_positive_net_theta && net_theta <= 0.0 {
        return Err(RejectReason::Theta {
            ticker: candidate.ticker.clone(),
            strike: candidate.strike,
            contract_type: candidate.contract_type,
            net_theta,
        });
    }

    Ok(ScreeningResult {
        ticker: candidate.ticker.clone(),
        stock_price: candidate.stock_price,
        strike: candidate.strike,
        contract_type: candidate.contract_type,
        near_expiry: candidate.near_expiry,
        far_expiry: candidate.far_expiry,
        net_credit,
        net_credit_display: format!("${:.2}", net_credit),
        net_theta,
        iv_diff,
        near_iv: near.iv,
        far_iv: far.iv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(bid: f64, ask: f64, volume: i64, oi: i64, iv: f64, theta: f64) -> LegData {
        LegData {
            bid,
            ask,
            volume,
            open_interest: oi,
            iv,
            theta,
            ..LegData::default()
        }
    }

    fn candidate(near: LegData, far: LegData) -> SpreadCandidate {
        SpreadCandidate {
            ticker: "AAPL".to_string(),
            stock_price: 101.0,
            strike: 100.0,
            contract_type: ContractType::Call,
            near_expiry: NaiveDate::from_ymd_opt(2026, 9, 4).unwrap(),
            far_expiry: NaiveDate::from_ymd_opt(2026, 9, 11).unwrap(),
            near,
            far,
        }
    }

    fn passing_candidate() -> SpreadCandidate {
        candidate(
            leg(2.00, 2.10, 200, 600, 0.30, -0.08),
            leg(1.40, 1.50, 150, 700, 0.22, -0.03),
        )
    }

    #[test]
    fn accepts_qualifying_spread() {
        let result = evaluate(&passing_candidate(), &ScreenConfig::default()).unwrap();

        assert!((result.net_credit - 0.50).abs() < 1e-9);
        assert_eq!(result.net_credit_display, "$0.50");
        assert!((result.iv_diff - 0.08).abs() < 1e-9);
        assert!((result.net_theta - 0.05).abs() < 1e-9);
        assert_eq!(result.near_iv, 0.30);
        assert_eq!(result.far_iv, 0.22);
    }

    #[test]
    fn illiquid_far_leg_names_far_leg() {
        let mut candidate = passing_candidate();
        candidate.far.volume = 50;

        let reason = evaluate(&candidate, &ScreenConfig::default()).unwrap_err();
        match reason {
            RejectReason::Liquidity {
                leg,
                volume,
                min_volume,
                ..
            } => {
                assert_eq!(leg, LegSide::Far);
                assert_eq!(volume, 50);
                assert_eq!(min_volume, 100);
            }
            other => panic!("expected liquidity rejection, got {:?}", other),
        }
        assert!(reason.to_string().contains("far leg illiquid"));
    }

    #[test]
    fn illiquid_near_leg_checked_first() {
        let mut candidate = passing_candidate();
        candidate.near.open_interest = 10;
        candidate.far.volume = 0;

        let reason = evaluate(&candidate, &ScreenConfig::default()).unwrap_err();
        assert!(matches!(
            reason,
            RejectReason::Liquidity {
                leg: LegSide::Near,
                ..
            }
        ));
    }

    #[test]
    fn net_debit_is_rejected() {
        let mut candidate = passing_candidate();
        candidate.far.ask = 2.50;

        let reason = evaluate(&candidate, &ScreenConfig::default()).unwrap_err();
        assert!(matches!(reason, RejectReason::Credit { .. }));
    }

    #[test]
    fn flat_term_structure_passes_default_premium() {
        // min_iv_premium defaults to 0.00, so equal IVs are acceptable.
        let mut candidate = passing_candidate();
        candidate.near.iv = 0.25;
        candidate.far.iv = 0.25;

        assert!(evaluate(&candidate, &ScreenConfig::default()).is_ok());

        let mut config = ScreenConfig::default();
        config.min_iv_premium = 0.02;
        let reason = evaluate(&candidate, &config).unwrap_err();
        assert!(matches!(reason, RejectReason::IvPremium { .. }));
    }

    #[test]
    fn negative_net_theta_is_rejected() {
        let mut candidate = passing_candidate();
        candidate.near.theta = -0.02;
        candidate.far.theta = -0.05;

        let reason = evaluate(&candidate, &ScreenConfig::default()).unwrap_err();
        match reason {
            RejectReason::Theta { net_theta, .. } => {
                assert!((net_theta - (-0.03)).abs() < 1e-9)
            }
            other => panic!("expected theta rejection, got {:?}", other),
        }
    }

    #[test]
    fn theta_check_can_be_disabled() {
        let mut candidate = passing_candidate();
        candidate.near.theta = -0.02;
        candidate.far.theta = -0.05;

        let mut config = ScreenConfig::default();
        config.require_positive_net_theta = false;
        assert!(evaluate(&candidate, &config).is_ok());
    }
}
