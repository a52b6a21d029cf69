use atrs_catalog::FareCalculator;
use atrs_core::{
    Clock, MemberRepository, ReferenceRepository, ReservationStore, TicketError, TicketResult,
    TicketRules,
};
use atrs_shared::{Flight, FlightType, Member, Passenger, PeakTime, Reservation};
use std::sync::Arc;
use tracing::info;

use crate::transactor::{ReservationTransactor, TicketReserveDto};
use crate::validator::ReservationValidator;

/// Ticket reservation entry point used by the reservation flow.
pub struct TicketReserveService {
    calculator: FareCalculator,
    validator: ReservationValidator,
    transactor: ReservationTransactor,
    members: Arc<dyn MemberRepository>,
}

impl TicketReserveService {
    pub fn new(
        rules: &TicketRules,
        peak_times: Vec<PeakTime>,
        members: Arc<dyn MemberRepository>,
        store: Arc<dyn ReservationStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            calculator: FareCalculator::new(rules, peak_times),
            validator: ReservationValidator::new(rules, members.clone(), clock.clone()),
            transactor: ReservationTransactor::new(store, clock),
            members,
        }
    }

    /// Build the service with peak-season reference data read from `reference`.
    pub async fn load(
        rules: &TicketRules,
        reference: &dyn ReferenceRepository,
        members: Arc<dyn MemberRepository>,
        store: Arc<dyn ReservationStore>,
        clock: Arc<dyn Clock>,
    ) -> TicketResult<Self> {
        let peak_times = reference.load_peak_times().await?;
        info!(peak_periods = peak_times.len(), ?rules, "Ticket reserve service ready");
        Ok(Self::new(rules, peak_times, members, store, clock))
    }

    pub fn calculate_total_fare(&self, flights: &[Flight], passengers: &[Passenger]) -> TicketResult<i32> {
        self.calculator.calculate_total_fare(flights, passengers)
    }

    /// Look up a card member by membership number.
    pub async fn find_member(&self, membership_number: &str) -> TicketResult<Option<Member>> {
        if membership_number.is_empty() {
            return Err(TicketError::invalid("membership number must not be empty"));
        }
        Ok(self.members.find_member(membership_number).await?)
    }

    pub fn validate_flight_selection(&self, flight_type: FlightType, flights: &[Flight]) -> TicketResult<()> {
        self.validator.validate_flight_selection(flight_type, flights)
    }

    pub async fn validate_reservation(&self, reservation: &Reservation) -> TicketResult<()> {
        self.validator.validate_reservation(reservation).await
    }

    pub async fn register_reservation(&self, reservation: &mut Reservation) -> TicketResult<TicketReserveDto> {
        self.transactor.register_reservation(reservation).await
    }

    /// Validate, price and register in one call.
    ///
    /// The fare is computed over every leg for the outbound passenger list; a
    /// round trip carries the same passengers both ways.
    pub async fn reserve(&self, reservation: &mut Reservation) -> TicketResult<TicketReserveDto> {
        self.validate_reservation(reservation).await?;

        let flights: Vec<Flight> = reservation
            .reserve_flights
            .iter()
            .map(|leg| leg.flight.clone())
            .collect();
        let passengers = reservation
            .outbound()
            .map(|leg| leg.passengers.as_slice())
            .unwrap_or_default();
        reservation.total_fare = self.calculate_total_fare(&flights, passengers)?;

        self.register_reservation(reservation).await
    }
}
