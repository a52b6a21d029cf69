use atrs_core::{
    BusinessError, Clock, FlightSelectionIssue, MemberRepository, TicketError, TicketResult,
    TicketRules,
};
use atrs_shared::{FareTypeCode, Flight, FlightType, Gender, Reservation, ReserveFlight};
use chrono::Duration;
use std::sync::Arc;
use tracing::debug;

/// Business-rule checks run before a reservation is committed.
///
/// Every check is a read; nothing here writes to a store.
pub struct ReservationValidator {
    representative_min_age: u32,
    limit_day: i64,
    reserve_interval_time: i64,
    members: Arc<dyn MemberRepository>,
    clock: Arc<dyn Clock>,
}

impl ReservationValidator {
    pub fn new(rules: &TicketRules, members: Arc<dyn MemberRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            representative_min_age: rules.representative_min_age,
            limit_day: rules.limit_day,
            reserve_interval_time: rules.reserve_interval_time,
            members,
            clock,
        }
    }

    /// Validate a reservation request.
    ///
    /// Checks run in a fixed order and stop at the first failure: representative
    /// age, fare-type eligibility per leg, representative membership, passenger
    /// memberships.
    pub async fn validate_reservation(&self, reservation: &Reservation) -> TicketResult<()> {
        if reservation.reserve_flights.is_empty() {
            return Err(TicketError::invalid("reservation has no flights"));
        }
        if reservation.reserve_flights.iter().any(|leg| leg.passengers.is_empty()) {
            return Err(TicketError::invalid("reserve flight has no passengers"));
        }

        self.validate_representative_age(reservation.rep_age)?;
        self.validate_fare_types(&reservation.reserve_flights)?;
        self.validate_representative_member(reservation).await?;
        self.validate_passenger_members(&reservation.reserve_flights).await?;

        debug!(
            legs = reservation.reserve_flights.len(),
            passengers = reservation.total_passenger_count(),
            "Reservation passed validation"
        );
        Ok(())
    }

    fn validate_representative_age(&self, age: u32) -> Result<(), BusinessError> {
        if age < self.representative_min_age {
            return Err(BusinessError::RepresentativeTooYoung {
                min_age: self.representative_min_age,
            });
        }
        Ok(())
    }

    fn validate_fare_types(&self, legs: &[ReserveFlight]) -> Result<(), BusinessError> {
        for leg in legs {
            let fare_type = &leg.flight.fare_type;
            match fare_type.code {
                FareTypeCode::LadiesDiscount => {
                    if leg.passengers.iter().any(|p| p.gender == Gender::Male) {
                        return Err(BusinessError::LadiesDiscountGenderViolation);
                    }
                }
                FareTypeCode::GroupDiscount => {
                    if leg.passenger_count() < fare_type.passenger_min_num as usize {
                        return Err(BusinessError::GroupDiscountMinimumNotMet {
                            fare_type_name: fare_type.name.clone(),
                            min_passengers: fare_type.passenger_min_num,
                        });
                    }
                }
                FareTypeCode::OneWay
                | FareTypeCode::RoundTrip
                | FareTypeCode::Reserve1
                | FareTypeCode::Reserve7
                | FareTypeCode::EarlySpecial => {}
            }
        }
        Ok(())
    }

    async fn validate_representative_member(&self, reservation: &Reservation) -> TicketResult<()> {
        let Some(number) = reservation.rep_membership_number() else {
            return Ok(());
        };

        let member = self
            .members
            .find_member(number)
            .await?
            .ok_or(BusinessError::MemberNotFound)?;

        if !member.matches(
            &reservation.rep_family_name,
            &reservation.rep_given_name,
            reservation.rep_gender,
        ) {
            return Err(BusinessError::RepresentativeIdentityMismatch.into());
        }
        Ok(())
    }

    /// Passenger positions are 1-based and restart on every leg.
    async fn validate_passenger_members(&self, legs: &[ReserveFlight]) -> TicketResult<()> {
        for leg in legs {
            for (index, passenger) in leg.passengers.iter().enumerate() {
                let Some(number) = passenger.membership_number() else {
                    continue;
                };
                let position = index + 1;

                let member = self
                    .members
                    .find_member(number)
                    .await?
                    .ok_or(BusinessError::PassengerMemberNotFound { position })?;

                if !member.matches(&passenger.family_name, &passenger.given_name, passenger.gender) {
                    return Err(BusinessError::PassengerIdentityMismatch { position }.into());
                }
            }
        }
        Ok(())
    }

    /// Check the flights picked for a trip before passengers are entered.
    ///
    /// One way takes one flight and a round trip two. Every departure must fall
    /// between today and `limit_day` days ahead, and a return flight must leave
    /// at least `reserve_interval_time` minutes after the outbound arrives.
    pub fn validate_flight_selection(&self, flight_type: FlightType, flights: &[Flight]) -> TicketResult<()> {
        let expected = flight_type.leg_count();
        if flights.len() != expected {
            return Err(selection(FlightSelectionIssue::WrongLegCount {
                expected,
                actual: flights.len(),
            }));
        }

        let today = self.clock.today();
        let last_day = today + Duration::days(self.limit_day);
        for flight in flights {
            if flight.departure_date < today || flight.departure_date > last_day {
                return Err(selection(FlightSelectionIssue::OutsideReservablePeriod {
                    departure_date: flight.departure_date,
                }));
            }
        }

        if let [outbound, inbound] = flights {
            let earliest_return = outbound.arrives_at() + Duration::minutes(self.reserve_interval_time);
            if inbound.departs_at() < earliest_return {
                return Err(selection(FlightSelectionIssue::ReturnTooSoon {
                    interval_minutes: self.reserve_interval_time,
                }));
            }
        }
        Ok(())
    }
}

fn selection(issue: FlightSelectionIssue) -> TicketError {
    BusinessError::FlightSelectionInvalid(issue).into()
}
