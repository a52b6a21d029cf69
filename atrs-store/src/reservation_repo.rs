use async_trait::async_trait;
use atrs_core::{ReservationStore, ReservationUnit, StoreError};
use atrs_shared::{Flight, FlightKey, Passenger, Reservation, ReserveFlight};
use sqlx::{PgPool, Postgres, Transaction};

use crate::flight_repo;

fn to_db_age(age: u32) -> Result<i32, StoreError> {
    i32::try_from(age).map_err(StoreError::backend)
}

pub struct PgReservationStore {
    pool: PgPool,
}

impl PgReservationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn begin(&self) -> Result<Box<dyn ReservationUnit>, StoreError> {
        let tx = self.pool.begin().await.map_err(StoreError::backend)?;
        Ok(Box::new(PgReservationUnit { tx }))
    }
}

/// A Postgres transaction. Dropping it without `commit` rolls back.
pub struct PgReservationUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ReservationUnit for PgReservationUnit {
    async fn find_flight_for_update(
        &mut self,
        key: &FlightKey,
    ) -> Result<Option<Flight>, StoreError> {
        flight_repo::find_for_update(&mut self.tx, key).await
    }

    async fn update_flight(&mut self, flight: &Flight) -> Result<u64, StoreError> {
        flight_repo::update_vacant_num(&mut self.tx, flight).await
    }

    async fn insert_reservation(
        &mut self,
        reservation: &mut Reservation,
    ) -> Result<u64, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            INSERT INTO reservation (
                reserve_date, total_fare, rep_family_name, rep_given_name, rep_gender,
                rep_age, rep_tel, rep_mail, rep_membership_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING reserve_no
            "#,
        )
        .bind(reservation.reserve_date)
        .bind(reservation.total_fare)
        .bind(&reservation.rep_family_name)
        .bind(&reservation.rep_given_name)
        .bind(reservation.rep_gender.as_str())
        .bind(to_db_age(reservation.rep_age)?)
        .bind(reservation.rep_tel.expose())
        .bind(reservation.rep_mail.as_ref().map(|m| m.expose().as_str()))
        .bind(reservation.rep_membership_number())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::backend)?;

        if let Some((reserve_no,)) = rows.first() {
            reservation.reserve_no = Some(reserve_no.trim().to_string());
        }
        Ok(rows.len() as u64)
    }

    async fn insert_reserve_flight(
        &mut self,
        reserve_flight: &mut ReserveFlight,
    ) -> Result<u64, StoreError> {
        let key = reserve_flight.flight.key();
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO reserve_flight (reserve_no, departure_date, flight_name, boarding_class_cd, fare_type_cd)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING reserve_flight_no
            "#,
        )
        .bind(reserve_flight.reserve_no.as_deref())
        .bind(key.departure_date)
        .bind(&key.flight_name)
        .bind(key.boarding_class.as_str())
        .bind(key.fare_type.as_str())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::backend)?;

        if let Some((reserve_flight_no,)) = rows.first() {
            reserve_flight.reserve_flight_no = Some(*reserve_flight_no);
        }
        Ok(rows.len() as u64)
    }

    async fn insert_passenger(&mut self, passenger: &mut Passenger) -> Result<u64, StoreError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO passenger (reserve_flight_no, family_name, given_name, age, gender, membership_number)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING passenger_no
            "#,
        )
        .bind(passenger.reserve_flight_no)
        .bind(&passenger.family_name)
        .bind(&passenger.given_name)
        .bind(to_db_age(passenger.age)?)
        .bind(passenger.gender.as_str())
        .bind(passenger.membership_number())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::backend)?;

        if let Some((passenger_no,)) = rows.first() {
            passenger.passenger_no = Some(*passenger_no);
        }
        Ok(rows.len() as u64)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let unit = *self;
        unit.tx.commit().await.map_err(StoreError::backend)
    }
}
