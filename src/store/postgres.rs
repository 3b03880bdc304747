use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    types::Json,
    Executor, Pool, Postgres, Row, Transaction,
};
use uuid::Uuid;

use super::Store;
use crate::entities::{find_conflict, Booking, Vehicle};
use crate::error::{conflict_error, not_found_error, Error};

type Database = Postgres;

pub struct PgStore {
    pool: Pool<Database>,
}

impl PgStore {
    #[tracing::instrument(name = "PgStore::new", skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        Self::with_pool(pool).await
    }

    /// Wraps an existing pool, creating the tables if they are missing.
    pub async fn with_pool(pool: Pool<Database>) -> Result<Self, Error> {
        pool.execute(
            "CREATE TABLE IF NOT EXISTS vehicles (
                id UUID PRIMARY KEY,
                seq BIGSERIAL NOT NULL,
                capacity_kg DOUBLE PRECISION NOT NULL,
                data JSONB NOT NULL
            )",
        )
        .await?;

        pool.execute(
            "CREATE TABLE IF NOT EXISTS bookings (
                id UUID PRIMARY KEY,
                seq BIGSERIAL NOT NULL,
                vehicle_id UUID NOT NULL,
                start_time TIMESTAMPTZ NOT NULL,
                end_time TIMESTAMPTZ NOT NULL,
                data JSONB NOT NULL,
                CONSTRAINT fk_booking_vehicle FOREIGN KEY(vehicle_id) REFERENCES vehicles(id),
                CONSTRAINT ck_booking_window CHECK (end_time > start_time)
            )",
        )
        .await?;

        pool.execute("CREATE INDEX IF NOT EXISTS idx_bookings_vehicle ON bookings (vehicle_id)")
            .await?;

        Ok(Self { pool })
    }
}

fn decode_all<T: DeserializeOwned>(rows: Vec<PgRow>) -> Result<Vec<T>, Error> {
    rows.iter()
        .map(|row| {
            let Json(item): Json<T> = row.try_get("data")?;
            Ok(item)
        })
        .collect()
}

#[tracing::instrument(skip(tx))]
async fn lock_vehicle(tx: &mut Transaction<'_, Database>, id: &Uuid) -> Result<(), Error> {
    tx.fetch_optional(sqlx::query("SELECT id FROM vehicles WHERE id = $1 FOR UPDATE").bind(id))
        .await?
        .ok_or_else(|| not_found_error("vehicle", id))?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
async fn fetch_bookings(
    tx: &mut Transaction<'_, Database>,
    vehicle_id: &Uuid,
) -> Result<Vec<Booking>, Error> {
    let rows = tx
        .fetch_all(
            sqlx::query("SELECT data FROM bookings WHERE vehicle_id = $1 ORDER BY seq")
                .bind(vehicle_id),
        )
        .await?;

    decode_all(rows)
}

#[async_trait]
impl Store for PgStore {
    #[tracing::instrument(skip(self, vehicle), fields(vehicle_id = %vehicle.id))]
    async fn insert_vehicle(&self, vehicle: &Vehicle) -> Result<(), Error> {
        self.pool
            .execute(
                sqlx::query("INSERT INTO vehicles (id, capacity_kg, data) VALUES ($1, $2, $3)")
                    .bind(&vehicle.id)
                    .bind(vehicle.capacity_kg)
                    .bind(Json(vehicle)),
            )
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, Error> {
        let rows = self
            .pool
            .fetch_all(sqlx::query("SELECT data FROM vehicles ORDER BY seq"))
            .await?;

        decode_all(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn vehicles_with_capacity(&self, capacity_kg: f64) -> Result<Vec<Vehicle>, Error> {
        let rows = self
            .pool
            .fetch_all(
                sqlx::query("SELECT data FROM vehicles WHERE capacity_kg >= $1 ORDER BY seq")
                    .bind(capacity_kg),
            )
            .await?;

        decode_all(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn list_bookings(&self) -> Result<Vec<Booking>, Error> {
        let rows = self
            .pool
            .fetch_all(sqlx::query("SELECT data FROM bookings ORDER BY seq"))
            .await?;

        decode_all(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn bookings_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Booking>, Error> {
        let rows = self
            .pool
            .fetch_all(
                sqlx::query("SELECT data FROM bookings WHERE vehicle_id = $1 ORDER BY seq")
                    .bind(&vehicle_id),
            )
            .await?;

        decode_all(rows)
    }

    #[tracing::instrument(skip(self, booking), fields(booking_id = %booking.id))]
    async fn insert_booking(&self, booking: &Booking) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;

        // the row lock serializes bookings for this vehicle until commit
        lock_vehicle(&mut tx, &booking.vehicle_id).await?;

        let existing = fetch_bookings(&mut tx, &booking.vehicle_id).await?;

        if let Some(conflict) = find_conflict(&existing, &booking.window()) {
            tracing::info!(conflict_id = %conflict.id, "booking overlaps, rolling back");
            return Err(conflict_error(&conflict.id));
        }

        tx.execute(
            sqlx::query(
                "INSERT INTO bookings (id, vehicle_id, start_time, end_time, data) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&booking.id)
            .bind(&booking.vehicle_id)
            .bind(booking.start_time)
            .bind(booking.end_time)
            .bind(Json(booking)),
        )
        .await?;

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_booking(&self, id: Uuid) -> Result<Option<Booking>, Error> {
        let maybe_row = self
            .pool
            .fetch_optional(sqlx::query("DELETE FROM bookings WHERE id = $1 RETURNING data").bind(&id))
            .await?;

        match maybe_row {
            Some(row) => {
                let Json(booking): Json<Booking> = row.try_get("data")?;
                Ok(Some(booking))
            }
            None => Ok(None),
        }
    }
}

#[test]
#[ignore = "requires a running postgres reachable through DATABASE_URL"]
fn pg_store_round_trip() {
    use crate::entities::{Pincode, RideWindow};
    use chrono::{TimeZone, Utc};
    use tokio_test::block_on;

    let db_uri = std::env::var("DATABASE_URL").unwrap();
    let store = block_on(PgStore::new(&db_uri, 2)).unwrap();

    let vehicle = Vehicle::new("Truck A".into(), 1000.0, 10);
    block_on(store.insert_vehicle(&vehicle)).unwrap();

    let window = RideWindow::new(
        Utc.with_ymd_and_hms(2025, 8, 20, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 8, 20, 11, 0, 0).unwrap(),
    );
    let booking = Booking::new(
        vehicle.id,
        Pincode(110001),
        Pincode(110003),
        window,
        "customer".into(),
    );
    block_on(store.insert_booking(&booking)).unwrap();

    let clash = Booking::new(
        vehicle.id,
        Pincode(110001),
        Pincode(110003),
        window,
        "other".into(),
    );
    assert!(block_on(store.insert_booking(&clash))
        .unwrap_err()
        .is_conflict_error());

    assert_eq!(
        block_on(store.bookings_for_vehicle(vehicle.id)).unwrap(),
        vec![booking.clone()]
    );
    assert_eq!(
        block_on(store.delete_booking(booking.id)).unwrap(),
        Some(booking)
    );
}
