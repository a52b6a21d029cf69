pub mod models;
pub mod pii;

pub use models::flight::{
    BoardingClass, BoardingClassCode, FareType, FareTypeCode, Flight, FlightKey, FlightMaster,
    FlightType, Route,
};
pub use models::calendar::PeakTime;
pub use models::member::{Gender, Member};
pub use models::reservation::{Passenger, Reservation, ReserveFlight};
pub use pii::Masked;

/// Raised when a stored code cannot be mapped back onto one of the closed enumerations.
#[derive(Debug, thiserror::Error)]
#[error("Unknown {kind} code: {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: String,
}
