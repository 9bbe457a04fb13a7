//! At-the-money strike selection.

use crate::error::{Error, Result};

/// The strike closest to `reference_price`. Strikes are scanned in
/// ascending order with a strict comparison, so an exact tie between
/// two strikes resolves to the lower one.
pub fn select_atm_strike(strikes: &[f64], reference_price: f64, ticker: &str) -> Result<f64> {
    if strikes.is_empty() {
        return Err(Error::NoStrikes(ticker.to_string()));
    }

    let mut sorted = strikes.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut best = sorted[0];
    let mut best_distance = (best - reference_price).abs();
    for &strike in &sorted[1..] {
        let distance = (strike - reference_price).abs();
        if distance < best_distance {
            best = strike;
            best_distance = distance;
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRIKES: [f64; 5] = [90.0, 95.0, 100.0, 105.0, 110.0];

    #[test]
    fn picks_closest_strike() {
        assert_eq!(select_atm_strike(&STRIKES, 101.0, "SPY").unwrap(), 100.0);
        assert_eq!(select_atm_strike(&STRIKES, 93.0, "SPY").unwrap(), 95.0);
        assert_eq!(select_atm_strike(&STRIKES, 250.0, "SPY").unwrap(), 110.0);
    }

    #[test]
    fn equidistant_tie_resolves_to_lower_strike() {
        assert_eq!(select_atm_strike(&STRIKES, 97.5, "SPY").unwrap(), 95.0);
    }

    #[test]
    fn deterministic_regardless_of_input_order() {
        let shuffled = [110.0, 90.0, 100.0, 105.0, 95.0];
        assert_eq!(select_atm_strike(&shuffled, 97.5, "SPY").unwrap(), 95.0);
    }

    #[test]
    fn empty_strikes_is_an_error() {
        let err = select_atm_strike(&[], 100.0, "SPY").unwrap_err();
        assert!(matches!(err, Error::NoStrikes(_)));
    }
}
