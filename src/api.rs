use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{AvailabilityQuery, Booking, NewBooking, NewVehicle, Vehicle};
use crate::error::Error;

#[async_trait]
pub trait VehicleAPI {
    async fn create_vehicle(&self, params: NewVehicle) -> Result<Vehicle, Error>;
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, Error>;

    /// Vehicles with enough capacity and no booking overlapping the ride
    /// window derived from the query.
    async fn available_vehicles(&self, query: AvailabilityQuery) -> Result<Vec<Vehicle>, Error>;
}

#[async_trait]
pub trait BookingAPI {
    async fn create_booking(&self, params: NewBooking) -> Result<Booking, Error>;
    async fn list_bookings(&self) -> Result<Vec<Booking>, Error>;
    async fn delete_booking(&self, id: &str) -> Result<Booking, Error>;
}

pub trait API: VehicleAPI + BookingAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
