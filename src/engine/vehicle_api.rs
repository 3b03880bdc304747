use super::helpers::{parse_capacity, parse_tyres, required, required_query};
use super::Engine;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::{
    api::VehicleAPI,
    entities::{
        find_conflict, parse_timestamp, AvailabilityQuery, NewVehicle, Pincode, RideWindow,
        Vehicle,
    },
    error::{validation_error, Error},
};

#[async_trait]
impl VehicleAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_vehicle(&self, params: NewVehicle) -> Result<Vehicle, Error> {
        let name = params
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| validation_error("name"))?;
        let capacity_kg = required("capacityKg", &params.capacity_kg)?;
        let tyres = required("tyres", &params.tyres)?;

        let capacity_kg = parse_capacity("capacityKg", capacity_kg, false)?;
        let tyres = parse_tyres("tyres", tyres)?;

        let vehicle = Vehicle::new(name.into(), capacity_kg, tyres);

        self.store.insert_vehicle(&vehicle).await?;

        tracing::info!(vehicle_id = %vehicle.id, "vehicle registered");

        Ok(vehicle)
    }

    #[tracing::instrument(skip(self))]
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, Error> {
        self.store.list_vehicles().await
    }

    #[tracing::instrument(skip(self))]
    async fn available_vehicles(&self, query: AvailabilityQuery) -> Result<Vec<Vehicle>, Error> {
        let capacity = required_query("capacity", &query.capacity)?;
        let from_pincode = required_query("fromPincode", &query.from_pincode)?;
        let to_pincode = required_query("toPincode", &query.to_pincode)?;
        let start_time = required_query("startTime", &query.start_time)?;

        let capacity_kg = parse_capacity("capacity", &capacity, true)?;
        let start_time = parse_timestamp("startTime", &start_time)?;

        let window = RideWindow::for_route(
            Pincode::parse("fromPincode", &from_pincode)?,
            Pincode::parse("toPincode", &to_pincode)?,
            start_time,
        )?;

        let candidates = self.store.vehicles_with_capacity(capacity_kg).await?;

        tracing::info!(
            candidates = candidates.len(),
            "checking candidate schedules against ride window"
        );

        let schedules = try_join_all(
            candidates
                .iter()
                .map(|vehicle| self.store.bookings_for_vehicle(vehicle.id)),
        )
        .await?;

        let available = candidates
            .into_iter()
            .zip(schedules)
            .filter(|(_, bookings)| find_conflict(bookings, &window).is_none())
            .map(|(vehicle, _)| vehicle)
            .collect();

        Ok(available)
    }
}
