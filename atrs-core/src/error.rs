use atrs_shared::FlightKey;

/// Error returned by the reservation core.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    /// Malformed input from the caller. Always an upstream defect.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Business(#[from] BusinessError),

    #[error(transparent)]
    Integrity(#[from] IntegrityFault),

    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

impl TicketError {
    pub fn invalid(message: impl Into<String>) -> Self {
        TicketError::InvalidArgument(message.into())
    }

    /// The business rejection, if this is one.
    pub fn business(&self) -> Option<&BusinessError> {
        match self {
            TicketError::Business(e) => Some(e),
            _ => None,
        }
    }
}

pub type TicketResult<T> = Result<T, TicketError>;

/// Recoverable, user-facing rejection of a reservation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusinessError {
    #[error("Flight selection rejected: {0}")]
    FlightSelectionInvalid(FlightSelectionIssue),

    #[error("Representative membership number is not registered")]
    MemberNotFound,

    #[error("Representative does not match the registered member")]
    RepresentativeIdentityMismatch,

    #[error("Representative must be at least {min_age} years old")]
    RepresentativeTooYoung { min_age: u32 },

    #[error("Passenger {position}: membership number is not registered")]
    PassengerMemberNotFound { position: usize },

    #[error("Passenger {position} does not match the registered member")]
    PassengerIdentityMismatch { position: usize },

    #[error("Ladies discount is available to female passengers only")]
    LadiesDiscountGenderViolation,

    #[error("Fare type is not available for the departure date")]
    FareTypeNotAvailable,

    #[error("Not enough vacant seats")]
    InsufficientSeats,

    #[error("{fare_type_name} requires at least {min_passengers} passengers")]
    GroupDiscountMinimumNotMet {
        fare_type_name: String,
        min_passengers: u32,
    },
}

impl BusinessError {
    /// Message code a presentation layer resolves into localized text.
    pub fn code(&self) -> &'static str {
        match self {
            BusinessError::FlightSelectionInvalid(_) => "e.ar.b2.2001",
            BusinessError::MemberNotFound => "e.ar.b2.2002",
            BusinessError::RepresentativeIdentityMismatch => "e.ar.b2.2003",
            BusinessError::RepresentativeTooYoung { .. } => "e.ar.b2.2004",
            BusinessError::PassengerMemberNotFound { .. } => "e.ar.b2.2005",
            BusinessError::PassengerIdentityMismatch { .. } => "e.ar.b2.2006",
            BusinessError::LadiesDiscountGenderViolation => "e.ar.b2.2007",
            BusinessError::FareTypeNotAvailable => "e.ar.b2.2008",
            BusinessError::InsufficientSeats => "e.ar.b2.2009",
            BusinessError::GroupDiscountMinimumNotMet { .. } => "e.ar.b2.2010",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlightSelectionIssue {
    #[error("expected {expected} flight(s), got {actual}")]
    WrongLegCount { expected: usize, actual: usize },

    #[error("departure {departure_date} is outside the reservable period")]
    OutsideReservablePeriod { departure_date: chrono::NaiveDate },

    #[error("return flight departs less than {interval_minutes} minutes after outbound arrival")]
    ReturnTooSoon { interval_minutes: i64 },
}

/// An insert or update touched an unexpected number of rows.
///
/// Store corruption, a lost update, or a logic defect. Never shown to users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{}] Unexpected row count on {operation}: expected {expected}, actual {actual}", IntegrityFault::CODE)]
pub struct IntegrityFault {
    pub operation: &'static str,
    pub expected: u64,
    pub actual: u64,
}

impl IntegrityFault {
    pub const CODE: &'static str = "e.ar.a0.l9002";

    /// Passes when exactly one row was affected.
    pub fn expect_single(operation: &'static str, actual: u64) -> Result<(), IntegrityFault> {
        if actual == 1 {
            Ok(())
        } else {
            Err(IntegrityFault {
                operation,
                expected: 1,
                actual,
            })
        }
    }
}

/// Failure inside a collaborator store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Flight not found: {0}")]
    FlightNotFound(FlightKey),

    #[error("Flight {0} is not locked by this transaction")]
    NotLocked(FlightKey),

    #[error("Backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_error_codes_are_distinct() {
        let errors = vec![
            BusinessError::FlightSelectionInvalid(FlightSelectionIssue::WrongLegCount {
                expected: 2,
                actual: 1,
            }),
            BusinessError::MemberNotFound,
            BusinessError::RepresentativeIdentityMismatch,
            BusinessError::RepresentativeTooYoung { min_age: 18 },
            BusinessError::PassengerMemberNotFound { position: 1 },
            BusinessError::PassengerIdentityMismatch { position: 1 },
            BusinessError::LadiesDiscountGenderViolation,
            BusinessError::FareTypeNotAvailable,
            BusinessError::InsufficientSeats,
            BusinessError::GroupDiscountMinimumNotMet {
                fare_type_name: "Group".to_string(),
                min_passengers: 5,
            },
        ];
        let mut codes: Vec<_> = errors.iter().map(BusinessError::code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_integrity_fault_single_row() {
        assert!(IntegrityFault::expect_single("update flight", 1).is_ok());

        let fault = IntegrityFault::expect_single("update flight", 0).unwrap_err();
        assert_eq!(fault.expected, 1);
        assert_eq!(fault.actual, 0);
        assert!(fault.to_string().contains("e.ar.a0.l9002"));
    }

    #[test]
    fn test_messages_carry_structured_data() {
        let err = BusinessError::GroupDiscountMinimumNotMet {
            fare_type_name: "Group discount".to_string(),
            min_passengers: 5,
        };
        assert_eq!(err.to_string(), "Group discount requires at least 5 passengers");

        let err: TicketError = BusinessError::PassengerIdentityMismatch { position: 3 }.into();
        assert_eq!(err.business().map(BusinessError::code), Some("e.ar.b2.2006"));
    }
}
