use axum::extract::{
    rejection::{JsonRejection, QueryRejection},
    Extension, Json, Query,
};

use super::Envelope;
use crate::api::DynAPI;
use crate::entities::{AvailabilityQuery, NewVehicle, Vehicle};
use crate::error::{invalid_request_error, Error};

pub async fn create(
    Extension(api): Extension<DynAPI>,
    payload: Result<Json<NewVehicle>, JsonRejection>,
) -> Result<Envelope<Vehicle>, Error> {
    let Json(params) = payload.map_err(invalid_request_error)?;

    let vehicle = api.create_vehicle(params).await?;

    Ok(Envelope::created(vehicle).with_message("Vehicle created successfully"))
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Envelope<Vec<Vehicle>>, Error> {
    let vehicles = api.list_vehicles().await?;

    Ok(Envelope::ok(vehicles))
}

pub async fn available(
    Extension(api): Extension<DynAPI>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Envelope<Vec<Vehicle>>, Error> {
    let Query(query) = query.map_err(invalid_request_error)?;

    let vehicles = api.available_vehicles(query).await?;

    Ok(Envelope::ok(vehicles))
}
