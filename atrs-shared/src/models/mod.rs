pub mod calendar;
pub mod flight;
pub mod member;
pub mod reservation;
