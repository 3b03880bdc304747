use super::helpers::{parse_id, required};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::BookingAPI,
    entities::{parse_timestamp, Booking, NewBooking, Pincode, RideWindow, Scalar},
    error::{not_found_error, validation_error, Error},
};

#[async_trait]
impl BookingAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_booking(&self, params: NewBooking) -> Result<Booking, Error> {
        let vehicle_id = match required("vehicleId", &params.vehicle_id)? {
            Scalar::Text(text) => parse_id("vehicleId", text)?,
            Scalar::Number(_) => return Err(validation_error("vehicleId")),
        };
        let from_pincode = required("fromPincode", &params.from_pincode)?;
        let to_pincode = required("toPincode", &params.to_pincode)?;
        let start_time = required("startTime", &params.start_time)?;
        let customer_id = required("customerId", &params.customer_id)?.to_text();

        let start_time = parse_timestamp("startTime", start_time)?;

        let from_pincode = Pincode::parse("fromPincode", from_pincode)?;
        let to_pincode = Pincode::parse("toPincode", to_pincode)?;
        let window = RideWindow::for_route(from_pincode, to_pincode, start_time)?;

        let booking = Booking::new(vehicle_id, from_pincode, to_pincode, window, customer_id);

        // existence and overlap are re-checked inside the store's write
        self.store.insert_booking(&booking).await.map_err(|err| {
            if err.is_conflict_error() || err.is_not_found_error() {
                tracing::warn!("booking rejected: {}", err.message);
            }
            err
        })?;

        tracing::info!(booking_id = %booking.id, "booking created");

        Ok(booking)
    }

    #[tracing::instrument(skip(self))]
    async fn list_bookings(&self) -> Result<Vec<Booking>, Error> {
        self.store.list_bookings().await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_booking(&self, id: &str) -> Result<Booking, Error> {
        let id = parse_id("id", id)?;

        let booking = self
            .store
            .delete_booking(id)
            .await?
            .ok_or_else(|| not_found_error("booking", &id))?;

        tracing::info!(booking_id = %booking.id, "booking deleted");

        Ok(booking)
    }
}
