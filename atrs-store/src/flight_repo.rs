use atrs_core::StoreError;
use atrs_shared::{
    BoardingClass, FareType, Flight, FlightKey, FlightMaster, Route, UnknownCode,
};
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgConnection;
use tracing::debug;

#[derive(sqlx::FromRow)]
struct FlightRow {
    departure_date: NaiveDate,
    flight_name: String,
    vacant_num: i32,
    departure_time: NaiveTime,
    arrival_time: NaiveTime,
    route_no: String,
    departure_airport_cd: String,
    arrival_airport_cd: String,
    basic_fare: i32,
    boarding_class_cd: String,
    boarding_class_name: String,
    extra_charge: i32,
    fare_type_cd: String,
    fare_type_name: String,
    discount_rate: i32,
    rsrv_available_start_day_num: i32,
    rsrv_available_end_day_num: i32,
    passenger_min_num: i32,
}

impl TryFrom<FlightRow> for Flight {
    type Error = UnknownCode;

    fn try_from(row: FlightRow) -> Result<Self, Self::Error> {
        Ok(Flight {
            departure_date: row.departure_date,
            flight_master: FlightMaster {
                flight_name: row.flight_name,
                route: Route {
                    route_no: row.route_no,
                    departure_airport_cd: row.departure_airport_cd,
                    arrival_airport_cd: row.arrival_airport_cd,
                    basic_fare: row.basic_fare,
                },
                departure_time: row.departure_time,
                arrival_time: row.arrival_time,
            },
            boarding_class: BoardingClass {
                code: row.boarding_class_cd.trim().parse()?,
                name: row.boarding_class_name,
                extra_charge: row.extra_charge,
            },
            fare_type: FareType {
                code: row.fare_type_cd.trim().parse()?,
                name: row.fare_type_name,
                discount_rate: row.discount_rate,
                reservable_start_day_num: i64::from(row.rsrv_available_start_day_num),
                reservable_end_day_num: i64::from(row.rsrv_available_end_day_num),
                passenger_min_num: row.passenger_min_num.max(0) as u32,
            },
            vacant_num: row.vacant_num,
        })
    }
}

/// Read a flight row and lock it until the surrounding transaction ends.
pub(crate) async fn find_for_update(
    conn: &mut PgConnection,
    key: &FlightKey,
) -> Result<Option<Flight>, StoreError> {
    debug!(flight = %key, "SELECT flight FOR UPDATE");

    let row: Option<FlightRow> = sqlx::query_as(
        r#"
        SELECT
            f.departure_date, f.flight_name, f.vacant_num,
            fm.departure_time, fm.arrival_time,
            r.route_no, r.departure_airport_cd, r.arrival_airport_cd, r.basic_fare,
            bc.boarding_class_cd, bc.boarding_class_name, bc.extra_charge,
            ft.fare_type_cd, ft.fare_type_name, ft.discount_rate,
            ft.rsrv_available_start_day_num, ft.rsrv_available_end_day_num, ft.passenger_min_num
        FROM flight f
        JOIN flight_master fm ON f.flight_name = fm.flight_name
        JOIN route r ON fm.route_no = r.route_no
        JOIN boarding_class bc ON f.boarding_class_cd = bc.boarding_class_cd
        JOIN fare_type ft ON f.fare_type_cd = ft.fare_type_cd
        WHERE
            f.departure_date = $1
            AND f.flight_name = $2
            AND f.boarding_class_cd = $3
            AND f.fare_type_cd = $4
        FOR UPDATE OF f
        "#,
    )
    .bind(key.departure_date)
    .bind(&key.flight_name)
    .bind(key.boarding_class.as_str())
    .bind(key.fare_type.as_str())
    .fetch_optional(&mut *conn)
    .await
    .map_err(StoreError::backend)?;

    row.map(Flight::try_from)
        .transpose()
        .map_err(StoreError::backend)
}

/// Persist the vacant seat count of a flight row.
pub(crate) async fn update_vacant_num(
    conn: &mut PgConnection,
    flight: &Flight,
) -> Result<u64, StoreError> {
    let key = flight.key();
    let result = sqlx::query(
        r#"
        UPDATE flight SET vacant_num = $1
        WHERE departure_date = $2 AND flight_name = $3 AND boarding_class_cd = $4 AND fare_type_cd = $5
        "#,
    )
    .bind(flight.vacant_num)
    .bind(key.departure_date)
    .bind(&key.flight_name)
    .bind(key.boarding_class.as_str())
    .bind(key.fare_type.as_str())
    .execute(&mut *conn)
    .await
    .map_err(StoreError::backend)?;

    Ok(result.rows_affected())
}
