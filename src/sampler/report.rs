use std::path::Path;
use std::time::Duration;

use super::reading::Reading;

pub fn banner(interval: Duration) -> String {
    format!(
        "Starting ISS tracker...\nGetting ISS position every {} seconds\nPress Ctrl+C to stop the program\n",
        interval.as_secs()
    )
}

/// Printed once the operator interrupts the run.
pub fn summary(collected: usize, path: &Path) -> String {
    format!(
        "\nStopping ISS tracker...\nCollected {} location points\nData saved to: {}",
        collected,
        path.display()
    )
}

/// Console lines printed after each successful cycle, separator included.
pub fn report(reading: &Reading) -> String {
    format!(
        "Time: {}\nPosition: {:.3}°N, {:.3}°E\nAltitude: {:.1} km\nSpeed: {:.1} km/h\n{}",
        reading.timestamp_string(),
        reading.latitude(),
        reading.longitude(),
        reading.altitude_km(),
        reading.velocity_km_h(),
        "-".repeat(50)
    )
}
