//! In-memory reservation store.
//!
//! Each flight row sits behind its own `tokio::sync::Mutex`. A unit of work
//! holds the owned guard of every row it read for update until it commits or
//! is dropped, which gives the same serialization as `SELECT ... FOR UPDATE`.
//! Writes are staged inside the unit and only become visible on commit.

use async_trait::async_trait;
use atrs_core::{
    MemberRepository, ReferenceRepository, ReservationStore, ReservationUnit, StoreError,
};
use atrs_shared::{Flight, FlightKey, Member, Passenger, PeakTime, Reservation, ReserveFlight};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as RowLock, OwnedMutexGuard};
use tracing::debug;

/// Write operations whose affected-row count can be overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOp {
    UpdateFlight,
    InsertReservation,
    InsertReserveFlight,
    InsertPassenger,
}

#[derive(Debug, Default, Clone)]
struct Tables {
    reservations: Vec<Reservation>,
    reserve_flights: Vec<ReserveFlight>,
    passengers: Vec<Passenger>,
}

#[derive(Default)]
struct Shared {
    flights: Mutex<HashMap<FlightKey, Arc<RowLock<Flight>>>>,
    members: Mutex<HashMap<String, Member>>,
    peak_times: Mutex<Vec<PeakTime>>,
    tables: Mutex<Tables>,
    row_count_overrides: Mutex<HashMap<WriteOp, u64>>,
    reserve_no_seq: AtomicI64,
    reserve_flight_no_seq: AtomicI64,
    passenger_no_seq: AtomicI64,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking test thread must not take the whole store down with it
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Shared {
    fn row(&self, key: &FlightKey) -> Option<Arc<RowLock<Flight>>> {
        guard(&self.flights).get(key).cloned()
    }

    fn take_override(&self, op: WriteOp) -> Option<u64> {
        guard(&self.row_count_overrides).remove(&op)
    }
}

/// Shared handle; clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_flight(&self, flight: Flight) {
        guard(&self.shared.flights).insert(flight.key(), Arc::new(RowLock::new(flight)));
    }

    pub fn insert_member(&self, member: Member) {
        guard(&self.shared.members).insert(member.membership_number.expose().clone(), member);
    }

    pub fn set_peak_times(&self, peak_times: Vec<PeakTime>) {
        *guard(&self.shared.peak_times) = peak_times;
    }

    /// Committed state of a flight row. Waits while another unit holds its lock.
    pub async fn flight(&self, key: &FlightKey) -> Option<Flight> {
        let row = self.shared.row(key)?;
        let flight = row.lock().await.clone();
        Some(flight)
    }

    pub fn reservations(&self) -> Vec<Reservation> {
        guard(&self.shared.tables).reservations.clone()
    }

    pub fn reserve_flights(&self) -> Vec<ReserveFlight> {
        guard(&self.shared.tables).reserve_flights.clone()
    }

    pub fn passengers(&self) -> Vec<Passenger> {
        guard(&self.shared.tables).passengers.clone()
    }

    /// Make the next `op` report `affected` rows without writing anything.
    ///
    /// Simulates lost updates and duplicate writes on the fault paths.
    pub fn override_row_count(&self, op: WriteOp, affected: u64) {
        guard(&self.shared.row_count_overrides).insert(op, affected);
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn find_member(&self, membership_number: &str) -> Result<Option<Member>, StoreError> {
        Ok(guard(&self.shared.members).get(membership_number).cloned())
    }
}

#[async_trait]
impl ReferenceRepository for MemoryStore {
    async fn load_peak_times(&self) -> Result<Vec<PeakTime>, StoreError> {
        Ok(guard(&self.shared.peak_times).clone())
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn ReservationUnit>, StoreError> {
        Ok(Box::new(MemoryUnit {
            shared: self.shared.clone(),
            locked: HashMap::new(),
            staged_flights: HashMap::new(),
            staged: Tables::default(),
        }))
    }
}

/// Unit of work over a [`MemoryStore`].
pub struct MemoryUnit {
    shared: Arc<Shared>,
    locked: HashMap<FlightKey, OwnedMutexGuard<Flight>>,
    staged_flights: HashMap<FlightKey, Flight>,
    staged: Tables,
}

impl MemoryUnit {
    fn current(&self, key: &FlightKey) -> Option<Flight> {
        self.staged_flights
            .get(key)
            .cloned()
            .or_else(|| self.locked.get(key).map(|row| (**row).clone()))
    }
}

#[async_trait]
impl ReservationUnit for MemoryUnit {
    async fn find_flight_for_update(
        &mut self,
        key: &FlightKey,
    ) -> Result<Option<Flight>, StoreError> {
        if !self.locked.contains_key(key) {
            let Some(row) = self.shared.row(key) else {
                return Ok(None);
            };
            debug!(flight = %key, "waiting for row lock");
            let locked = row.lock_owned().await;
            self.locked.insert(key.clone(), locked);
        }
        Ok(self.current(key))
    }

    async fn update_flight(&mut self, flight: &Flight) -> Result<u64, StoreError> {
        let key = flight.key();
        if !self.locked.contains_key(&key) {
            return Err(StoreError::NotLocked(key));
        }
        if let Some(affected) = self.shared.take_override(WriteOp::UpdateFlight) {
            return Ok(affected);
        }
        self.staged_flights.insert(key, flight.clone());
        Ok(1)
    }

    async fn insert_reservation(
        &mut self,
        reservation: &mut Reservation,
    ) -> Result<u64, StoreError> {
        if let Some(affected) = self.shared.take_override(WriteOp::InsertReservation) {
            return Ok(affected);
        }
        let seq = self.shared.reserve_no_seq.fetch_add(1, Ordering::SeqCst) + 1;
        reservation.reserve_no = Some(format!("{:010}", seq));

        let mut row = reservation.clone();
        row.reserve_flights.clear();
        self.staged.reservations.push(row);
        Ok(1)
    }

    async fn insert_reserve_flight(
        &mut self,
        reserve_flight: &mut ReserveFlight,
    ) -> Result<u64, StoreError> {
        if let Some(affected) = self.shared.take_override(WriteOp::InsertReserveFlight) {
            return Ok(affected);
        }
        let seq = self.shared.reserve_flight_no_seq.fetch_add(1, Ordering::SeqCst) + 1;
        reserve_flight.reserve_flight_no = Some(seq);

        let mut row = reserve_flight.clone();
        row.passengers.clear();
        self.staged.reserve_flights.push(row);
        Ok(1)
    }

    async fn insert_passenger(&mut self, passenger: &mut Passenger) -> Result<u64, StoreError> {
        if let Some(affected) = self.shared.take_override(WriteOp::InsertPassenger) {
            return Ok(affected);
        }
        let seq = self.shared.passenger_no_seq.fetch_add(1, Ordering::SeqCst) + 1;
        passenger.passenger_no = Some(seq);
        self.staged.passengers.push(passenger.clone());
        Ok(1)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryUnit {
            shared,
            mut locked,
            staged_flights,
            staged,
        } = *self;

        for (key, flight) in staged_flights {
            let row = locked.get_mut(&key).ok_or(StoreError::NotLocked(key))?;
            **row = flight;
        }

        let mut tables = guard(&shared.tables);
        tables.reservations.extend(staged.reservations);
        tables.reserve_flights.extend(staged.reserve_flights);
        tables.passengers.extend(staged.passengers);
        drop(tables);

        // Row locks are released here
        drop(locked);
        Ok(())
    }
}
