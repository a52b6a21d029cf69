#![allow(dead_code)]

use atrs_core::{FixedClock, TicketRules};
use atrs_reserve::TicketReserveService;
use atrs_shared::{
    BoardingClass, BoardingClassCode, FareType, FareTypeCode, Flight, FlightMaster, Gender,
    Masked, Member, Passenger, Reservation, ReserveFlight, Route,
};
use atrs_store::MemoryStore;
use chrono::{Duration, NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

pub fn fare_type(code: FareTypeCode) -> FareType {
    let (name, discount_rate, start, end, min) = match code {
        FareTypeCode::OneWay => ("One way", 0, 355, 0, 1),
        FareTypeCode::RoundTrip => ("Round trip", 10, 355, 0, 1),
        FareTypeCode::Reserve1 => ("Reserve 1", 15, 355, 1, 1),
        FareTypeCode::Reserve7 => ("Reserve 7", 20, 355, 7, 1),
        FareTypeCode::EarlySpecial => ("Early special", 40, 355, 28, 1),
        FareTypeCode::LadiesDiscount => ("Ladies discount", 20, 355, 1, 1),
        FareTypeCode::GroupDiscount => ("Group discount", 20, 355, 1, 5),
    };
    FareType {
        code,
        name: name.to_string(),
        discount_rate,
        reservable_start_day_num: start,
        reservable_end_day_num: end,
        passenger_min_num: min,
    }
}

pub fn flight(
    flight_name: &str,
    days_ahead: i64,
    departs: (u32, u32),
    code: FareTypeCode,
    vacant_num: i32,
) -> Flight {
    let departure_time = NaiveTime::from_hms_opt(departs.0, departs.1, 0).unwrap();
    Flight {
        departure_date: today() + Duration::days(days_ahead),
        flight_master: FlightMaster {
            flight_name: flight_name.to_string(),
            route: Route {
                route_no: "0001".to_string(),
                departure_airport_cd: "HND".to_string(),
                arrival_airport_cd: "ITM".to_string(),
                basic_fare: 10000,
            },
            departure_time,
            arrival_time: departure_time + Duration::minutes(70),
        },
        boarding_class: BoardingClass {
            code: BoardingClassCode::Normal,
            name: "Normal".to_string(),
            extra_charge: 0,
        },
        fare_type: fare_type(code),
        vacant_num,
    }
}

pub fn adult(given_name: &str) -> Passenger {
    Passenger::new("デンデン", given_name, 35, Gender::Female)
}

pub fn reservation(legs: Vec<ReserveFlight>) -> Reservation {
    Reservation {
        reserve_no: None,
        reserve_date: None,
        total_fare: 0,
        rep_family_name: "デンデン".to_string(),
        rep_given_name: "ハナコ".to_string(),
        rep_gender: Gender::Female,
        rep_age: 35,
        rep_tel: Masked("03-1234-5678".to_string()),
        rep_mail: Some(Masked("hanako@example.com".to_string())),
        rep_membership_number: None,
        reserve_flights: legs,
    }
}

pub fn member() -> Member {
    Member {
        membership_number: Masked("0000000001".to_string()),
        kana_family_name: "デンデン".to_string(),
        kana_given_name: "ハナコ".to_string(),
        gender: Gender::Female,
        tel: Some(Masked("03-1234-5678".to_string())),
        mail: None,
    }
}

pub fn service(store: &MemoryStore) -> TicketReserveService {
    let shared = Arc::new(store.clone());
    TicketReserveService::new(
        &TicketRules::default(),
        Vec::new(),
        shared.clone(),
        shared,
        Arc::new(FixedClock::on(today())),
    )
}
