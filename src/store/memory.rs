use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::entities::{find_conflict, Booking, Vehicle};
use crate::error::{conflict_error, not_found_error, Error};

#[derive(Default)]
struct Collections {
    vehicles: Vec<Vehicle>,
    bookings: Vec<Booking>,
}

/// Process-local store. State is lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_vehicle(&self, vehicle: &Vehicle) -> Result<(), Error> {
        self.collections.write().await.vehicles.push(vehicle.clone());

        Ok(())
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, Error> {
        Ok(self.collections.read().await.vehicles.clone())
    }

    async fn vehicles_with_capacity(&self, capacity_kg: f64) -> Result<Vec<Vehicle>, Error> {
        let collections = self.collections.read().await;

        Ok(collections
            .vehicles
            .iter()
            .filter(|vehicle| vehicle.can_carry(capacity_kg))
            .cloned()
            .collect())
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, Error> {
        Ok(self.collections.read().await.bookings.clone())
    }

    async fn bookings_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Booking>, Error> {
        let collections = self.collections.read().await;

        Ok(collections
            .bookings
            .iter()
            .filter(|booking| booking.vehicle_id == vehicle_id)
            .cloned()
            .collect())
    }

    #[tracing::instrument(skip(self, booking), fields(booking_id = %booking.id))]
    async fn insert_booking(&self, booking: &Booking) -> Result<(), Error> {
        // held across check and push
        let mut collections = self.collections.write().await;

        if !collections
            .vehicles
            .iter()
            .any(|vehicle| vehicle.id == booking.vehicle_id)
        {
            return Err(not_found_error("vehicle", &booking.vehicle_id));
        }

        let existing: Vec<Booking> = collections
            .bookings
            .iter()
            .filter(|other| other.vehicle_id == booking.vehicle_id)
            .cloned()
            .collect();

        if let Some(conflict) = find_conflict(&existing, &booking.window()) {
            return Err(conflict_error(&conflict.id));
        }

        collections.bookings.push(booking.clone());

        Ok(())
    }

    async fn delete_booking(&self, id: Uuid) -> Result<Option<Booking>, Error> {
        let mut collections = self.collections.write().await;

        let position = collections
            .bookings
            .iter()
            .position(|booking| booking.id == id);

        Ok(position.map(|index| collections.bookings.remove(index)))
    }
}
