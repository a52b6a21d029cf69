use atrs_core::{TicketError, TicketResult, TicketRules};
use atrs_shared::{BoardingClass, Flight, Passenger, PeakTime};
use chrono::NaiveDate;

/// Fare unit the billed total is rounded up to
const FARE_UNIT: i64 = 100;

/// Round a fare up to the next multiple of 100. Exact multiples are unchanged.
pub fn ceil_fare(fare: i64) -> Option<i64> {
    let remainder = fare.rem_euclid(FARE_UNIT);
    if remainder == 0 {
        Some(fare)
    } else {
        fare.checked_add(FARE_UNIT - remainder)
    }
}

/// Apply a fare-type discount (percent) to a basic fare, truncating.
pub fn discounted_fare(basic_fare: i64, discount_rate: i32) -> Option<i64> {
    Some(basic_fare.checked_mul(100 - i64::from(discount_rate))? / 100)
}

fn out_of_range() -> TicketError {
    TicketError::invalid("fare out of range")
}

/// Ticket fare calculation. Pure and deterministic for a given rule set.
#[derive(Debug, Clone)]
pub struct FareCalculator {
    adult_passenger_min_age: u32,
    child_fare_rate: i32,
    peak_times: Vec<PeakTime>,
}

impl FareCalculator {
    pub fn new(rules: &TicketRules, peak_times: Vec<PeakTime>) -> Self {
        Self {
            adult_passenger_min_age: rules.adult_passenger_min_age,
            child_fare_rate: rules.child_fare_rate,
            peak_times,
        }
    }

    /// Seasonal ratio (percent) for a departure date; 100 outside every peak period.
    pub fn peak_ratio(&self, departure_date: NaiveDate) -> i32 {
        self.peak_times
            .iter()
            .find(|peak| peak.covers(departure_date))
            .map(|peak| peak.peak_ratio)
            .unwrap_or(100)
    }

    /// Basic fare of one seat: route fare plus class surcharge, scaled by the seasonal ratio.
    pub fn basic_fare(
        &self,
        route_basic_fare: i32,
        boarding_class: &BoardingClass,
        departure_date: NaiveDate,
    ) -> Option<i64> {
        let fare = i64::from(route_basic_fare) + i64::from(boarding_class.extra_charge);
        Some(fare.checked_mul(i64::from(self.peak_ratio(departure_date)))? / 100)
    }

    fn flight_fare(&self, flight: &Flight, adult_num: i64, child_num: i64) -> Option<i64> {
        let basic_fare = self.basic_fare(
            flight.flight_master.route.basic_fare,
            &flight.boarding_class,
            flight.departure_date,
        )?;
        let discount_rate = flight.fare_type.discount_rate;
        let boarding_fare = discounted_fare(basic_fare, discount_rate)?;
        let child_fare = basic_fare
            .checked_mul(i64::from(self.child_fare_rate) - i64::from(discount_rate))?
            / 100;

        boarding_fare
            .checked_mul(adult_num)?
            .checked_add(child_fare.checked_mul(child_num)?)
    }

    /// Total price of the given flights for the given passengers.
    ///
    /// Per flight: `fare * adults + basic * (child_rate - discount) / 100 * children`,
    /// summed over flights and rounded up to the next 100.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when either list is empty or the total does not fit a fare amount.
    pub fn calculate_total_fare(&self, flights: &[Flight], passengers: &[Passenger]) -> TicketResult<i32> {
        if flights.is_empty() {
            return Err(TicketError::invalid("flights must not be empty"));
        }
        if passengers.is_empty() {
            return Err(TicketError::invalid("passengers must not be empty"));
        }

        let children = passengers
            .iter()
            .filter(|p| p.age < self.adult_passenger_min_age)
            .count();
        let child_num = i64::try_from(children).map_err(|_| out_of_range())?;
        let adult_num = i64::try_from(passengers.len() - children).map_err(|_| out_of_range())?;

        let mut total_fare: i64 = 0;
        for flight in flights {
            let flight_fare = self
                .flight_fare(flight, adult_num, child_num)
                .ok_or_else(out_of_range)?;
            total_fare = total_fare.checked_add(flight_fare).ok_or_else(out_of_range)?;
        }

        let total_fare = ceil_fare(total_fare).ok_or_else(out_of_range)?;
        i32::try_from(total_fare).map_err(|_| out_of_range())
    }
}
