use serde::{Deserialize, Serialize};

/// Coordinates and motion data of a single fix.
///
/// Values the platform cannot provide are reported as negative numbers,
/// matching what the platform itself does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coords {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
    /// Altitude in meters above sea level.
    pub altitude: f64,
    /// Horizontal accuracy in meters.
    pub accuracy: f64,
    /// Vertical accuracy in meters.
    pub altitude_accuracy: f64,
    /// Course in degrees relative to true north.
    pub heading: f64,
    /// Ground speed in meters per second.
    pub speed: f64,
}

/// A single location reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Where the device was.
    pub coords: Coords,
    /// When the fix was taken, as Unix epoch milliseconds.
    pub timestamp: f64,
}

impl LocationFix {
    /// Age of the fix relative to `now_ms`, in milliseconds.
    #[must_use]
    pub fn age(&self, now_ms: f64) -> f64 {
        now_ms - self.timestamp
    }
}
