use serde::{Deserialize, Serialize};

/// A loosely typed request value. Dashboard clients send pincodes, times and
/// customer ids either as JSON numbers or as strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Number(_) => false,
            Scalar::Text(text) => text.trim().is_empty(),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Scalar::Number(number) => number.to_string(),
            Scalar::Text(text) => text.trim().to_string(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Scalar::Text(text.into())
    }
}

impl From<String> for Scalar {
    fn from(text: String) -> Self {
        Scalar::Text(text)
    }
}

impl From<u64> for Scalar {
    fn from(number: u64) -> Self {
        Scalar::Number(number.into())
    }
}

impl From<i64> for Scalar {
    fn from(number: i64) -> Self {
        Scalar::Number(number.into())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub name: Option<String>,
    pub capacity_kg: Option<Scalar>,
    pub tyres: Option<Scalar>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub vehicle_id: Option<Scalar>,
    pub from_pincode: Option<Scalar>,
    pub to_pincode: Option<Scalar>,
    pub start_time: Option<Scalar>,
    pub customer_id: Option<Scalar>,
}

/// Query string of an availability search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub capacity: Option<String>,
    pub from_pincode: Option<String>,
    pub to_pincode: Option<String>,
    pub start_time: Option<String>,
}

#[test]
fn new_booking_accepts_numbers_and_strings() {
    let params: NewBooking = serde_json::from_str(
        r#"{
            "vehicleId": "b3d3c7a4-8f55-4a51-9a3b-2d1c8c35d0a1",
            "fromPincode": 110001,
            "toPincode": "560001",
            "startTime": "2025-08-20T10:00:00Z",
            "customerId": 42
        }"#,
    )
    .unwrap();

    assert_eq!(params.from_pincode, Some(Scalar::from(110001u64)));
    assert_eq!(params.to_pincode, Some(Scalar::from("560001")));
    assert_eq!(params.customer_id.unwrap().to_text(), "42");
}

#[test]
fn missing_and_null_fields_are_none() {
    let params: NewBooking = serde_json::from_str(r#"{"vehicleId": null}"#).unwrap();

    assert!(params.vehicle_id.is_none());
    assert!(params.start_time.is_none());
}

#[test]
fn blank_text_is_blank() {
    assert!(Scalar::from("   ").is_blank());
    assert!(!Scalar::from(0u64).is_blank());
}
