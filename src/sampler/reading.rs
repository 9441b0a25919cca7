use chrono::{DateTime, Utc};

use crate::source::{ApiPosition, FetchError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One normalized sample of the tracked object.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    timestamp: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    altitude_km: f64,
    velocity_km_h: f64,
}

impl Reading {
    pub fn from_position(position: &ApiPosition) -> Result<Self, FetchError> {
        let timestamp = DateTime::from_timestamp(position.timestamp, 0)
            .ok_or(FetchError::InvalidField("timestamp"))?;

        Ok(Self {
            timestamp,
            latitude: position.latitude,
            longitude: position.longitude,
            altitude_km: position.altitude,
            velocity_km_h: position.velocity,
        })
    }

    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude_km(&self) -> f64 {
        self.altitude_km
    }

    pub fn velocity_km_h(&self) -> f64 {
        self.velocity_km_h
    }
}
