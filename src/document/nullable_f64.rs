//! Serde adapter for floats that may not be finite
//!
//! JSON has no NaN or infinity. A non-finite value is written as `null` and
//! `null` reads back as NaN, the same rule the body applies to flight data.
//! Use with `#[serde(with = "nullable_f64")]`.

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
