use async_trait::async_trait;
use atrs_shared::{Flight, FlightKey, Member, Passenger, PeakTime, Reservation, ReserveFlight};

use crate::error::StoreError;

/// Member lookup by membership number.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn find_member(&self, membership_number: &str) -> Result<Option<Member>, StoreError>;
}

/// Reference data consumed by fare calculation.
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    async fn load_peak_times(&self) -> Result<Vec<PeakTime>, StoreError>;
}

/// Entry point for transactional reservation writes.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Open a unit of work. Nothing it writes is visible until `commit`.
    async fn begin(&self) -> Result<Box<dyn ReservationUnit>, StoreError>;
}

/// One transaction against flight and reservation data.
///
/// Row locks taken by `find_flight_for_update` are held until the unit is
/// committed or dropped. Dropping an uncommitted unit rolls every write back.
/// Each write returns the affected row count; inserts fill the generated
/// identifier into the record passed in.
#[async_trait]
pub trait ReservationUnit: Send {
    /// Read the flight row and take its exclusive lock.
    async fn find_flight_for_update(&mut self, key: &FlightKey)
        -> Result<Option<Flight>, StoreError>;

    async fn update_flight(&mut self, flight: &Flight) -> Result<u64, StoreError>;

    async fn insert_reservation(&mut self, reservation: &mut Reservation)
        -> Result<u64, StoreError>;

    async fn insert_reserve_flight(&mut self, reserve_flight: &mut ReserveFlight)
        -> Result<u64, StoreError>;

    async fn insert_passenger(&mut self, passenger: &mut Passenger) -> Result<u64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
