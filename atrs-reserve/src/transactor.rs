use atrs_catalog::is_available_fare_type;
use atrs_core::{
    BusinessError, Clock, IntegrityFault, ReservationStore, ReservationUnit, StoreError,
    TicketError, TicketResult,
};
use atrs_shared::{Flight, FlightKey, Reservation};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Outcome of a committed reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketReserveDto {
    pub reserve_no: String,
    /// Payment must be completed by the outbound departure date
    pub payment_date: NaiveDate,
    pub total_fare: i32,
}

/// Fails with an integrity fault unless exactly one row was affected.
fn expect_single(operation: &'static str, affected: u64) -> TicketResult<()> {
    IntegrityFault::expect_single(operation, affected).map_err(|fault| {
        error!(
            code = IntegrityFault::CODE,
            operation,
            expected = fault.expected,
            actual = fault.actual,
            "Unexpected affected row count"
        );
        TicketError::Integrity(fault)
    })
}

/// Seat inventory decrement and reservation persistence in one transaction.
pub struct ReservationTransactor {
    store: Arc<dyn ReservationStore>,
    clock: Arc<dyn Clock>,
}

impl ReservationTransactor {
    pub fn new(store: Arc<dyn ReservationStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Register a reservation and decide its payment deadline.
    ///
    /// Seat counts, the reservation, its legs and passengers are written in a
    /// single unit of work; any failure drops the unit and nothing is kept.
    /// Generated identifiers are filled into `reservation` as rows are inserted
    /// and cleared again when the unit does not commit.
    ///
    /// Flight rows are locked in ascending [`FlightKey`] order regardless of leg
    /// order, so two reservations touching the same flights cannot deadlock.
    pub async fn register_reservation(&self, reservation: &mut Reservation) -> TicketResult<TicketReserveDto> {
        let payment_date = reservation
            .outbound()
            .map(|leg| leg.flight.departure_date)
            .ok_or_else(|| TicketError::invalid("reservation has no flights"))?;
        if reservation.reserve_flights.iter().any(|leg| leg.passengers.is_empty()) {
            return Err(TicketError::invalid("reserve flight has no passengers"));
        }

        let today = self.clock.today();
        for leg in &reservation.reserve_flights {
            let flight = &leg.flight;
            if !is_available_fare_type(&flight.fare_type, flight.departure_date, today) {
                warn!(flight = %flight.key(), "Fare type no longer available");
                return Err(BusinessError::FareTypeNotAvailable.into());
            }
        }

        // Seats wanted per inventory row, iterated in lock order
        let mut seats_wanted: BTreeMap<FlightKey, usize> = BTreeMap::new();
        for leg in &reservation.reserve_flights {
            *seats_wanted.entry(leg.flight.key()).or_default() += leg.passenger_count();
        }

        let caller_reserve_date = reservation.reserve_date;
        reservation.reserve_date.get_or_insert(today);

        let reserve_no = match self.write(reservation, &seats_wanted).await {
            Ok(reserve_no) => reserve_no,
            Err(e) => {
                clear_identifiers(reservation);
                reservation.reserve_date = caller_reserve_date;
                return Err(e);
            }
        };

        info!(
            reserve_no = %reserve_no,
            legs = reservation.reserve_flights.len(),
            passengers = reservation.total_passenger_count(),
            total_fare = reservation.total_fare,
            %payment_date,
            "Reservation registered"
        );

        Ok(TicketReserveDto {
            reserve_no,
            payment_date,
            total_fare: reservation.total_fare,
        })
    }

    async fn write(
        &self,
        reservation: &mut Reservation,
        seats_wanted: &BTreeMap<FlightKey, usize>,
    ) -> TicketResult<String> {
        let mut unit = self.store.begin().await?;

        for (key, passenger_num) in seats_wanted {
            let mut flight = lock_flight(unit.as_mut(), key).await?;
            take_seats(&mut flight, *passenger_num)?;
            let affected = unit.update_flight(&flight).await?;
            expect_single("update flight", affected)?;
            debug!(flight = %key, vacant_num = flight.vacant_num, "Seats decremented");
        }

        let affected = unit.insert_reservation(reservation).await?;
        expect_single("insert reservation", affected)?;
        let reserve_no = reservation
            .reserve_no
            .clone()
            .ok_or_else(|| missing_identifier("insert reservation"))?;

        for leg in reservation.reserve_flights.iter_mut() {
            leg.reserve_no = Some(reserve_no.clone());
            let affected = unit.insert_reserve_flight(leg).await?;
            expect_single("insert reserve flight", affected)?;
            let reserve_flight_no = leg
                .reserve_flight_no
                .ok_or_else(|| missing_identifier("insert reserve flight"))?;

            for passenger in leg.passengers.iter_mut() {
                passenger.reserve_flight_no = Some(reserve_flight_no);
                let affected = unit.insert_passenger(passenger).await?;
                expect_single("insert passenger", affected)?;
            }
        }

        unit.commit().await?;
        Ok(reserve_no)
    }
}

/// Identifiers handed out inside a unit that never committed.
fn clear_identifiers(reservation: &mut Reservation) {
    reservation.reserve_no = None;
    for leg in reservation.reserve_flights.iter_mut() {
        leg.reserve_no = None;
        leg.reserve_flight_no = None;
        for passenger in leg.passengers.iter_mut() {
            passenger.passenger_no = None;
            passenger.reserve_flight_no = None;
        }
    }
}

/// Exclusive access to one flight row for the rest of the unit of work.
async fn lock_flight(unit: &mut dyn ReservationUnit, key: &FlightKey) -> TicketResult<Flight> {
    debug!(flight = %key, "Locking flight");
    unit.find_flight_for_update(key)
        .await?
        .ok_or_else(|| StoreError::FlightNotFound(key.clone()).into())
}

fn take_seats(flight: &mut Flight, passenger_num: usize) -> TicketResult<()> {
    let wanted = i32::try_from(passenger_num)
        .map_err(|_| TicketError::invalid("passenger count out of range"))?;
    if flight.vacant_num < wanted {
        warn!(
            flight = %flight.key(),
            vacant_num = flight.vacant_num,
            requested = wanted,
            "Not enough vacant seats"
        );
        return Err(BusinessError::InsufficientSeats.into());
    }
    flight.vacant_num -= wanted;
    Ok(())
}

/// A store reported one inserted row but filled no identifier.
fn missing_identifier(operation: &'static str) -> TicketError {
    error!(code = IntegrityFault::CODE, operation, "Inserted row has no generated identifier");
    TicketError::Integrity(IntegrityFault {
        operation,
        expected: 1,
        actual: 0,
    })
}
