use atrs_shared::FareType;
use chrono::{Duration, NaiveDate};

/// Whether `fare_type` can be booked on `today` for a flight departing on `departure_date`.
///
/// The window opens `reservable_start_day_num` days before departure and closes
/// `reservable_end_day_num` days before departure, both ends inclusive. A day
/// count that leaves the calendar range makes the fare type unavailable.
pub fn is_available_fare_type(fare_type: &FareType, departure_date: NaiveDate, today: NaiveDate) -> bool {
    let opens = days_before(departure_date, fare_type.reservable_start_day_num);
    let closes = days_before(departure_date, fare_type.reservable_end_day_num);
    match (opens, closes) {
        (Some(opens), Some(closes)) => opens <= today && today <= closes,
        _ => false,
    }
}

fn days_before(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::try_days(days)?)
}
