use serde::Serialize;
use std::path::Path;

use super::reading::Reading;

const HEADER: [&str; 5] = [
    "timestamp",
    "latitude",
    "longitude",
    "altitude_km",
    "velocity_km_h",
];

#[derive(Serialize)]
struct Row {
    timestamp: String,
    latitude: f64,
    longitude: f64,
    altitude_km: f64,
    velocity_km_h: f64,
}

impl From<&Reading> for Row {
    fn from(reading: &Reading) -> Self {
        Row {
            timestamp: reading.timestamp_string(),
            latitude: reading.latitude(),
            longitude: reading.longitude(),
            altitude_km: reading.altitude_km(),
            velocity_km_h: reading.velocity_km_h(),
        }
    }
}

/// Append-only record of every reading taken during this run.
#[derive(Debug, Default)]
pub struct ReadingLog {
    readings: Vec<Reading>,
}

impl ReadingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reading: Reading) {
        self.readings.push(reading);
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn last(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Rewrites `path` from scratch: header, then one row per reading in insertion order.
    pub fn persist(&self, path: &Path) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;

        writer.write_record(HEADER)?;
        for reading in &self.readings {
            writer.serialize(Row::from(reading))?;
        }
        writer.flush()?;
        Ok(())
    }
}
