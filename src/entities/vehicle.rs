use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tyre counts offered when registering a vehicle.
pub const TYRE_OPTIONS: [u32; 3] = [4, 10, 12];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub capacity_kg: f64,
    pub tyres: u32,
}

impl Vehicle {
    pub fn new(name: String, capacity_kg: f64, tyres: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            capacity_kg,
            tyres,
        }
    }

    pub fn can_carry(&self, capacity_kg: f64) -> bool {
        self.capacity_kg >= capacity_kg
    }
}

#[test]
fn vehicle_serializes_camel_case() {
    let vehicle = Vehicle::new("Truck A".into(), 1000.0, 6);
    let value = serde_json::to_value(&vehicle).unwrap();

    assert_eq!(value["name"], "Truck A");
    assert_eq!(value["capacityKg"], 1000.0);
    assert_eq!(value["tyres"], 6);
    assert_eq!(value["id"], vehicle.id.to_string());
}

#[test]
fn vehicle_carries_up_to_capacity() {
    let vehicle = Vehicle::new("Truck A".into(), 1000.0, 10);

    assert!(vehicle.can_carry(999.5));
    assert!(vehicle.can_carry(1000.0));
    assert!(!vehicle.can_carry(1000.5));
}
