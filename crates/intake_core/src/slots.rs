//! crates/intake_core/src/slots.rs
//!
//! Computes the bookable half-hour slots for a provider on a calendar date.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::directory::ProviderDirectory;
use crate::ports::{PortError, PortResult};

/// First bookable start of the business day, in minutes after midnight.
const OPEN_MINUTES: u32 = 9 * 60;
/// Last bookable start (16:30 for a 9:00 to 17:00 business day).
const LAST_START_MINUTES: u32 = 16 * 60 + 30;
const SLOT_MINUTES: u32 = 30;

/// The bookable start times for `date`, given the current local date.
///
/// Empty for dates strictly before `today` and for weekends; otherwise every
/// half-hour start from 09:00 through 16:30 inclusive, ascending and
/// zero-padded. Pure so tests can pin both dates.
pub fn day_slots(date: NaiveDate, today: NaiveDate) -> Vec<String> {
    if date < today {
        return Vec::new();
    }
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return Vec::new();
    }

    let mut slots = Vec::with_capacity(16);
    let mut minutes = OPEN_MINUTES;
    while minutes <= LAST_START_MINUTES {
        slots.push(format!("{:02}:{:02}", minutes / 60, minutes % 60));
        minutes += SLOT_MINUTES;
    }
    slots
}

/// Resolves `provider_id` and `date` and returns the day's slots.
///
/// Every provider currently shares the same weekday template; the provider
/// lookup only gates unknown ids.
pub fn slots_for(
    directory: &ProviderDirectory,
    provider_id: &str,
    date: &str,
    today: NaiveDate,
) -> PortResult<Vec<String>> {
    if directory.get(provider_id).is_none() {
        return Err(PortError::NotFound(format!(
            "Provider {} not found",
            provider_id
        )));
    }
    let date = parse_date(date)?;
    Ok(day_slots(date, today))
}

/// Parses a `YYYY-MM-DD` calendar date, rejecting malformed input.
pub fn parse_date(value: &str) -> PortResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| PortError::Validation(format!("'{}' is not a valid YYYY-MM-DD date", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(value: &str) -> NaiveDate {
        value.parse().unwrap()
    }

    #[test]
    fn weekday_produces_the_full_half_hour_grid() {
        // 2025-03-04 is a Tuesday.
        let slots = day_slots(date("2025-03-04"), date("2025-03-03"));
        assert_eq!(slots.len(), 16);
        assert_eq!(slots.first().map(String::as_str), Some("09:00"));
        assert_eq!(slots.last().map(String::as_str), Some("16:30"));
        assert!(slots.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(slots[1], "09:30");
        assert_eq!(slots[2], "10:00");
    }

    #[test]
    fn weekends_are_closed() {
        // 2025-03-08 is a Saturday, 2025-03-09 a Sunday.
        let today = date("2025-03-03");
        assert!(day_slots(date("2025-03-08"), today).is_empty());
        assert!(day_slots(date("2025-03-09"), today).is_empty());
    }

    #[test]
    fn past_dates_are_closed_but_today_is_open() {
        // 2025-03-04 is a Tuesday; the 3rd is the Monday before it.
        let today = date("2025-03-04");
        assert!(day_slots(today - Duration::days(1), today).is_empty());
        assert_eq!(day_slots(today, today).len(), 16);
    }

    #[test]
    fn unknown_provider_and_malformed_date_are_rejected() {
        let directory = ProviderDirectory::with_demo_roster();
        let today = date("2025-03-03");

        let err = slots_for(&directory, "no-such-provider", "2025-03-04", today).unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));

        let provider_id = directory.list(None)[0].id.clone();
        let err = slots_for(&directory, &provider_id, "03/04/2025", today).unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));

        let slots = slots_for(&directory, &provider_id, "2025-03-04", today).unwrap();
        assert_eq!(slots.len(), 16);
    }
}
