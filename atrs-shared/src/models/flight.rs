use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::UnknownCode;

/// Cabin class of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BoardingClassCode {
    #[serde(rename = "N")]
    Normal,
    #[serde(rename = "S")]
    Special,
}

impl BoardingClassCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardingClassCode::Normal => "N",
            BoardingClassCode::Special => "S",
        }
    }
}

impl fmt::Display for BoardingClassCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardingClassCode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(BoardingClassCode::Normal),
            "S" => Ok(BoardingClassCode::Special),
            other => Err(UnknownCode {
                kind: "boarding class",
                code: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingClass {
    pub code: BoardingClassCode,
    pub name: String,
    /// Surcharge added to the route fare before seasonal scaling
    pub extra_charge: i32,
}

/// Pricing category of a flight. Eligibility rules are keyed on this code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FareTypeCode {
    #[serde(rename = "OW")]
    OneWay,
    #[serde(rename = "RT")]
    RoundTrip,
    #[serde(rename = "RS1")]
    Reserve1,
    #[serde(rename = "RS7")]
    Reserve7,
    #[serde(rename = "ES")]
    EarlySpecial,
    #[serde(rename = "LD")]
    LadiesDiscount,
    #[serde(rename = "GD")]
    GroupDiscount,
}

impl FareTypeCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FareTypeCode::OneWay => "OW",
            FareTypeCode::RoundTrip => "RT",
            FareTypeCode::Reserve1 => "RS1",
            FareTypeCode::Reserve7 => "RS7",
            FareTypeCode::EarlySpecial => "ES",
            FareTypeCode::LadiesDiscount => "LD",
            FareTypeCode::GroupDiscount => "GD",
        }
    }
}

impl fmt::Display for FareTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FareTypeCode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OW" => Ok(FareTypeCode::OneWay),
            "RT" => Ok(FareTypeCode::RoundTrip),
            "RS1" => Ok(FareTypeCode::Reserve1),
            "RS7" => Ok(FareTypeCode::Reserve7),
            "ES" => Ok(FareTypeCode::EarlySpecial),
            "LD" => Ok(FareTypeCode::LadiesDiscount),
            "GD" => Ok(FareTypeCode::GroupDiscount),
            other => Err(UnknownCode {
                kind: "fare type",
                code: other.to_string(),
            }),
        }
    }
}

/// Fare type reference data.
///
/// A fare type can be booked from `reservable_start_day_num` days before departure
/// up to `reservable_end_day_num` days before departure, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareType {
    pub code: FareTypeCode,
    pub name: String,
    /// Percentage taken off the basic fare (0-100)
    pub discount_rate: i32,
    pub reservable_start_day_num: i64,
    pub reservable_end_day_num: i64,
    /// Minimum passengers per leg; only meaningful for group discount
    pub passenger_min_num: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub route_no: String,
    pub departure_airport_cd: String,
    pub arrival_airport_cd: String,
    pub basic_fare: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightMaster {
    pub flight_name: String,
    pub route: Route,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
}

/// A scheduled departure for one boarding class and fare type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub departure_date: NaiveDate,
    pub flight_master: FlightMaster,
    pub boarding_class: BoardingClass,
    pub fare_type: FareType,
    pub vacant_num: i32,
}

impl Flight {
    pub fn key(&self) -> FlightKey {
        FlightKey {
            departure_date: self.departure_date,
            flight_name: self.flight_master.flight_name.clone(),
            boarding_class: self.boarding_class.code,
            fare_type: self.fare_type.code,
        }
    }

    pub fn departs_at(&self) -> NaiveDateTime {
        self.departure_date.and_time(self.flight_master.departure_time)
    }

    /// Arrival timestamp; an arrival clock time earlier than departure lands the next day.
    pub fn arrives_at(&self) -> NaiveDateTime {
        let master = &self.flight_master;
        let date = if master.arrival_time < master.departure_time {
            self.departure_date + Duration::days(1)
        } else {
            self.departure_date
        };
        date.and_time(master.arrival_time)
    }
}

/// Identity of a seat inventory row, also used as the row lock key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlightKey {
    pub departure_date: NaiveDate,
    pub flight_name: String,
    pub boarding_class: BoardingClassCode,
    pub fare_type: FareTypeCode,
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.departure_date, self.flight_name, self.boarding_class, self.fare_type
        )
    }
}

/// Trip shape chosen by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightType {
    #[serde(rename = "RT")]
    RoundTrip,
    #[serde(rename = "OW")]
    OneWay,
}

impl FlightType {
    pub fn leg_count(&self) -> usize {
        match self {
            FlightType::RoundTrip => 2,
            FlightType::OneWay => 1,
        }
    }
}
