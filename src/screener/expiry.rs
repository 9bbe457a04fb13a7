//! Weekly option expiration dates.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// The next `n` weekly expiration Fridays strictly after `reference`,
/// 7 days apart. When `reference` is itself a Friday the sequence
/// starts the following week; a same-day expiry is never returned.
pub fn next_fridays(n: usize, reference: NaiveDate) -> Vec<NaiveDate> {
    // Monday = 0 .. Sunday = 6, Friday = 4.
    let weekday = reference.weekday().num_days_from_monday() as i64;
    let mut days_ahead = (4 - weekday + 7) % 7;
    if days_ahead == 0 {
        days_ahead = 7;
    }

    let first = reference + Duration::days(days_ahead);
    (0..n)
        .map(|week| first + Duration::weeks(week as i64))
        .collect()
}
