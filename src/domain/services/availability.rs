use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use crate::domain::models::availability_override::AvailabilityOverride;
use crate::domain::models::booking::Booking;
use crate::domain::models::property::Property;

/// Half-open interval overlap: an existing booking conflicts with
/// `[check_in, check_out)` iff it occupies at least one of its nights.
/// Callers pass bookings already filtered to PENDING/CONFIRMED.
pub fn has_overlap(existing: &[Booking], check_in: NaiveDate, check_out: NaiveDate) -> bool {
    existing.iter().any(|b| b.check_in < check_out && b.check_out > check_in)
}

/// First host-blocked date inside `[check_in, check_out)`, if any.
pub fn first_blocked_date(
    overrides: &[AvailabilityOverride],
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Option<NaiveDate> {
    overrides
        .iter()
        .filter(|o| !o.is_available && o.date >= check_in && o.date < check_out)
        .map(|o| o.date)
        .min()
}

/// Total charge for `[check_in, check_out)` in cents: one night per date in
/// the range (checkout date excluded), override price per night when set,
/// base nightly price otherwise, plus the flat fees. Pure function of its
/// inputs.
pub fn total_cents(
    property: &Property,
    overrides: &[AvailabilityOverride],
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> i64 {
    let by_date: HashMap<NaiveDate, &AvailabilityOverride> =
        overrides.iter().map(|o| (o.date, o)).collect();

    let mut nights_total = 0i64;
    let mut date = check_in;
    while date < check_out {
        let nightly = by_date
            .get(&date)
            .and_then(|o| o.price_cents)
            .unwrap_or(property.nightly_price_cents);
        nights_total += nightly;
        date += Duration::days(1);
    }

    nights_total
        + property.cleaning_fee_cents.unwrap_or(0)
        + property.service_fee_cents.unwrap_or(0)
}

#[derive(Debug, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub is_available: bool,
    pub price_cents: i64,
    pub is_booked: bool,
    pub booking_id: Option<String>,
}

/// Per-date projection of the calendar for `[start, end]`, both inclusive:
/// this is a display range, not a stay range.
pub fn build_calendar(
    property: &Property,
    bookings: &[Booking],
    overrides: &[AvailabilityOverride],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DayAvailability> {
    let by_date: HashMap<NaiveDate, &AvailabilityOverride> =
        overrides.iter().map(|o| (o.date, o)).collect();

    let mut days = Vec::new();
    let mut date = start;
    while date <= end {
        let rule = by_date.get(&date);
        let booking = bookings
            .iter()
            .find(|b| b.check_in <= date && date < b.check_out);

        let host_blocked = rule.is_some_and(|o| !o.is_available);
        days.push(DayAvailability {
            date,
            is_available: !host_blocked && booking.is_none(),
            price_cents: rule
                .and_then(|o| o.price_cents)
                .unwrap_or(property.nightly_price_cents),
            is_booked: booking.is_some(),
            booking_id: booking.map(|b| b.id.clone()),
        });
        date += Duration::days(1);
    }
    days
}
