use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Pincode, RideWindow};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub from_pincode: Pincode,
    pub to_pincode: Pincode,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub customer_id: String,
}

impl Booking {
    pub fn new(
        vehicle_id: Uuid,
        from_pincode: Pincode,
        to_pincode: Pincode,
        window: RideWindow,
        customer_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            from_pincode,
            to_pincode,
            start_time: window.start,
            end_time: window.end,
            customer_id,
        }
    }

    pub fn window(&self) -> RideWindow {
        RideWindow::new(self.start_time, self.end_time)
    }
}

/// First booking in `bookings` whose window overlaps `window`.
pub fn find_conflict<'a>(bookings: &'a [Booking], window: &RideWindow) -> Option<&'a Booking> {
    bookings
        .iter()
        .find(|booking| booking.window().overlaps(window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 20, hour, 0, 0).unwrap()
    }

    fn booking(vehicle_id: Uuid, start: u32, end: u32) -> Booking {
        Booking::new(
            vehicle_id,
            Pincode(110001),
            Pincode(110002),
            RideWindow::new(at(start), at(end)),
            "customer".into(),
        )
    }

    #[test]
    fn no_conflict_on_empty_schedule() {
        let window = RideWindow::new(at(9), at(11));

        assert!(find_conflict(&[], &window).is_none());
    }

    #[test]
    fn finds_first_overlapping_booking() {
        let vehicle_id = Uuid::new_v4();
        let bookings = vec![
            booking(vehicle_id, 6, 8),
            booking(vehicle_id, 9, 11),
            booking(vehicle_id, 10, 12),
        ];

        let conflict = find_conflict(&bookings, &RideWindow::new(at(10), at(11))).unwrap();

        assert_eq!(conflict.id, bookings[1].id);
    }

    #[test]
    fn adjacent_bookings_are_not_conflicts() {
        let vehicle_id = Uuid::new_v4();
        let bookings = vec![booking(vehicle_id, 7, 9), booking(vehicle_id, 11, 13)];

        assert!(find_conflict(&bookings, &RideWindow::new(at(9), at(11))).is_none());
    }

    #[test]
    fn booking_serializes_camel_case() {
        let booking = booking(Uuid::new_v4(), 9, 11);
        let value = serde_json::to_value(&booking).unwrap();

        assert_eq!(value["fromPincode"], 110001);
        assert_eq!(value["toPincode"], 110002);
        assert_eq!(value["customerId"], "customer");
        assert_eq!(value["vehicleId"], booking.vehicle_id.to_string());

        let parsed: Booking = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, booking);
    }
}
