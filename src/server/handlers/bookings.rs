use axum::extract::{rejection::JsonRejection, Extension, Json, Path};

use super::Envelope;
use crate::api::DynAPI;
use crate::entities::{Booking, NewBooking};
use crate::error::{invalid_request_error, Error};

pub async fn create(
    Extension(api): Extension<DynAPI>,
    payload: Result<Json<NewBooking>, JsonRejection>,
) -> Result<Envelope<Booking>, Error> {
    let Json(params) = payload.map_err(invalid_request_error)?;

    let booking = api.create_booking(params).await?;

    Ok(Envelope::created(booking).with_message("Booking created successfully"))
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Envelope<Vec<Booking>>, Error> {
    let bookings = api.list_bookings().await?;

    Ok(Envelope::ok(bookings))
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Envelope<Booking>, Error> {
    let booking = api.delete_booking(&id).await?;

    Ok(Envelope::ok(booking).with_message("Booking deleted successfully"))
}
