pub mod clock;
pub mod config;
pub mod error;
pub mod repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::TicketRules;
pub use error::{
    BusinessError, FlightSelectionIssue, IntegrityFault, StoreError, TicketError, TicketResult,
};
pub use repository::{MemberRepository, ReferenceRepository, ReservationStore, ReservationUnit};
