use uuid::Uuid;

use crate::{
    entities::{Scalar, TYRE_OPTIONS},
    error::{validation_error, Error},
};

pub fn required<'a>(field: &str, value: &'a Option<Scalar>) -> Result<&'a Scalar, Error> {
    value
        .as_ref()
        .filter(|scalar| !scalar.is_blank())
        .ok_or_else(|| validation_error(field))
}

pub fn required_query(field: &str, value: &Option<String>) -> Result<Scalar, Error> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(Scalar::Text(text.clone())),
        _ => Err(validation_error(field)),
    }
}

pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw.trim()).map_err(|_| validation_error(field))
}

/// Positive, finite kilograms. Text is accepted only when `allow_text` is set,
/// as for query strings.
pub fn parse_capacity(field: &str, raw: &Scalar, allow_text: bool) -> Result<f64, Error> {
    let capacity = match raw {
        Scalar::Number(number) => number.as_f64(),
        Scalar::Text(text) if allow_text => text.trim().parse::<f64>().ok(),
        Scalar::Text(_) => None,
    };

    capacity
        .filter(|kg| kg.is_finite() && *kg > 0.0)
        .ok_or_else(|| validation_error(field))
}

pub fn parse_tyres(field: &str, raw: &Scalar) -> Result<u32, Error> {
    let tyres = match raw {
        Scalar::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Scalar::Text(_) => None,
    };

    tyres
        .filter(|count| TYRE_OPTIONS.contains(count))
        .ok_or_else(|| validation_error(field))
}

#[test]
fn required_rejects_missing_and_blank() {
    assert!(required("customerId", &None).is_err());
    assert!(required("customerId", &Some(Scalar::from("  "))).is_err());
    assert!(required("customerId", &Some(Scalar::from(7u64))).is_ok());
}

#[test]
fn capacity_must_be_positive() {
    assert_eq!(parse_capacity("capacity", &Scalar::from("750"), true).unwrap(), 750.0);
    assert!(parse_capacity("capacity", &Scalar::from("0"), true).is_err());
    assert!(parse_capacity("capacity", &Scalar::from("-3"), true).is_err());
    assert!(parse_capacity("capacity", &Scalar::from("NaN"), true).is_err());
    assert!(parse_capacity("capacity", &Scalar::from("heavy"), true).is_err());
    assert!(parse_capacity("capacityKg", &Scalar::from("750"), false).is_err());
}

#[test]
fn tyres_must_be_an_offered_count() {
    for count in TYRE_OPTIONS {
        assert_eq!(parse_tyres("tyres", &Scalar::from(count as u64)).unwrap(), count);
    }

    assert!(parse_tyres("tyres", &Scalar::from(6u64)).is_err());
    assert!(parse_tyres("tyres", &Scalar::from("4")).is_err());
}

#[test]
fn ids_must_be_uuids() {
    let id = Uuid::new_v4();

    assert_eq!(parse_id("id", &id.to_string()).unwrap(), id);
    assert!(parse_id("id", "64e0c1f2a9b8c7d6e5f4a3b2").is_err());
}
