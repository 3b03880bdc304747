mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{delete, get},
    Router,
};

use crate::server::handlers::{bookings, vehicles};
use crate::{
    api::{DynAPI, API},
    error::{unexpected_error, Error},
};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/api/vehicles", get(vehicles::list).post(vehicles::create))
        .route("/api/vehicles/available", get(vehicles::available))
        .route("/api/booking", get(bookings::list).post(bookings::create))
        .route("/api/booking/:id", delete(bookings::delete))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = router(Arc::new(api));

    let server = axum::Server::try_bind(&addr).map_err(unexpected_error)?;

    tracing::info!("listening on {}", addr);

    server
        .serve(app.into_make_service())
        .await
        .map_err(unexpected_error)
}
