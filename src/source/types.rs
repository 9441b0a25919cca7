use serde_json::Value;

use super::error::FetchError;

/// Raw position report as returned by the remote service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApiPosition {
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub velocity: f64,
}

impl ApiPosition {
    pub fn from_json(body: &Value) -> Result<Self, FetchError> {
        Ok(Self {
            timestamp: epoch_field(body, "timestamp")?,
            latitude: number_field(body, "latitude")?,
            longitude: number_field(body, "longitude")?,
            altitude: number_field(body, "altitude")?,
            velocity: number_field(body, "velocity")?,
        })
    }

    pub fn from_slice(body: &[u8]) -> Result<Self, FetchError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_json(&value)
    }
}

fn field<'a>(body: &'a Value, name: &'static str) -> Result<&'a Value, FetchError> {
    body.get(name).ok_or(FetchError::MissingField(name))
}

fn number_field(body: &Value, name: &'static str) -> Result<f64, FetchError> {
    field(body, name)?
        .as_f64()
        .ok_or(FetchError::InvalidField(name))
}

fn epoch_field(body: &Value, name: &'static str) -> Result<i64, FetchError> {
    let value = field(body, name)?;
    if let Some(secs) = value.as_i64() {
        return Ok(secs);
    }
    match value.as_f64() {
        Some(secs) if secs.is_finite() => Ok(secs.floor() as i64),
        _ => Err(FetchError::InvalidField(name)),
    }
}
