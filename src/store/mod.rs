mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Booking, Vehicle};
use crate::error::Error;

/// Persistent collections of vehicles and bookings.
///
/// Listings come back in insertion order.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_vehicle(&self, vehicle: &Vehicle) -> Result<(), Error>;

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, Error>;

    /// Vehicles whose capacity is at least `capacity_kg`.
    async fn vehicles_with_capacity(&self, capacity_kg: f64) -> Result<Vec<Vehicle>, Error>;

    async fn list_bookings(&self) -> Result<Vec<Booking>, Error>;

    async fn bookings_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Booking>, Error>;

    /// Persists `booking` unless its vehicle is missing (not found) or one of
    /// the vehicle's bookings overlaps it (conflict). The existence check, the
    /// overlap check and the write happen atomically per vehicle.
    async fn insert_booking(&self, booking: &Booking) -> Result<(), Error>;

    /// Removes a booking, returning it if it existed.
    async fn delete_booking(&self, id: Uuid) -> Result<Option<Booking>, Error>;
}
