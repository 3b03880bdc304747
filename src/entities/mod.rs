mod booking;
mod params;
mod ride;
mod vehicle;

pub use booking::{find_conflict, Booking};
pub use params::{AvailabilityQuery, NewBooking, NewVehicle, Scalar};
pub use ride::{parse_timestamp, ride_duration_hours, Pincode, RideWindow, MIN_RIDE_HOURS};
pub use vehicle::{Vehicle, TYRE_OPTIONS};
