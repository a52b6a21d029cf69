pub mod availability;
pub mod pricing;

pub use availability::is_available_fare_type;
pub use pricing::{ceil_fare, discounted_fare, FareCalculator};
