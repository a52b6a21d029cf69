use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Flight, Gender, Masked};

/// Treats an empty membership number the same as an absent one.
fn supplied(number: &Option<Masked<String>>) -> Option<&str> {
    number
        .as_ref()
        .map(|n| n.expose().as_str())
        .filter(|n| !n.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Assigned on insert
    pub passenger_no: Option<i64>,
    /// Set from the owning leg before insert
    pub reserve_flight_no: Option<i64>,
    pub family_name: String,
    pub given_name: String,
    pub age: u32,
    pub gender: Gender,
    pub membership_number: Option<Masked<String>>,
}

impl Passenger {
    pub fn new(family_name: &str, given_name: &str, age: u32, gender: Gender) -> Self {
        Self {
            passenger_no: None,
            reserve_flight_no: None,
            family_name: family_name.to_string(),
            given_name: given_name.to_string(),
            age,
            gender,
            membership_number: None,
        }
    }

    pub fn with_membership_number(mut self, number: &str) -> Self {
        self.membership_number = Some(Masked(number.to_string()));
        self
    }

    pub fn membership_number(&self) -> Option<&str> {
        supplied(&self.membership_number)
    }
}

/// One directional leg of a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveFlight {
    /// Assigned on insert
    pub reserve_flight_no: Option<i64>,
    pub reserve_no: Option<String>,
    pub flight: Flight,
    pub passengers: Vec<Passenger>,
}

impl ReserveFlight {
    pub fn new(flight: Flight, passengers: Vec<Passenger>) -> Self {
        Self {
            reserve_flight_no: None,
            reserve_no: None,
            flight,
            passengers,
        }
    }

    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }
}

/// Reservation aggregate: the representative plus one leg (one way) or two (round trip).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Assigned on insert
    pub reserve_no: Option<String>,
    pub reserve_date: Option<NaiveDate>,
    pub total_fare: i32,
    pub rep_family_name: String,
    pub rep_given_name: String,
    pub rep_gender: Gender,
    pub rep_age: u32,
    pub rep_tel: Masked<String>,
    pub rep_mail: Option<Masked<String>>,
    pub rep_membership_number: Option<Masked<String>>,
    pub reserve_flights: Vec<ReserveFlight>,
}

impl Reservation {
    pub fn rep_membership_number(&self) -> Option<&str> {
        supplied(&self.rep_membership_number)
    }

    /// The outbound leg, if any.
    pub fn outbound(&self) -> Option<&ReserveFlight> {
        self.reserve_flights.first()
    }

    pub fn total_passenger_count(&self) -> usize {
        self.reserve_flights.iter().map(ReserveFlight::passenger_count).sum()
    }
}
