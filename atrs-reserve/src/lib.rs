pub mod service;
pub mod transactor;
pub mod validator;

pub use service::TicketReserveService;
pub use transactor::{ReservationTransactor, TicketReserveDto};
pub use validator::ReservationValidator;
