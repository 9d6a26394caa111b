//! Request options as the host runtime sends them.
//!
//! Hosts pass loosely-typed option maps; every field is optional and falls
//! back to the defaults documented on each struct.

use serde::{Deserialize, Serialize};

use crate::LocationFix;

/// Distance filter applied to continuous updates when the host gives none.
pub const DEFAULT_UPDATE_DISTANCE_FILTER: f64 = 100.0;

/// Accuracy tier requested from a location source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Accuracy {
    /// Highest accuracy, intended for navigation.
    BestForNavigation,
    /// Best accuracy the device offers.
    Best,
    /// Within ten meters.
    NearestTenMeters,
    /// Within a hundred meters.
    HundredMeters,
    /// Within a kilometer.
    Kilometer,
    /// Within three kilometers.
    ThreeKilometers,
}

impl Accuracy {
    /// Tier implied by the `enableHighAccuracy` flag.
    #[must_use]
    pub const fn from_high_accuracy(enabled: bool) -> Self {
        if enabled {
            Self::Best
        } else {
            Self::HundredMeters
        }
    }
}

/// Options for a one-shot position request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionOptions {
    /// Minimum movement in meters between fixes; `None` disables filtering.
    pub distance_filter: Option<f64>,
    /// Request the best accuracy tier.
    pub enable_high_accuracy: bool,
    /// Explicit accuracy tier, overriding `enable_high_accuracy`.
    pub accuracy: Option<Accuracy>,
    /// Oldest acceptable cached fix in milliseconds; `None` accepts any age.
    pub maximum_age: Option<f64>,
    /// Accepted for compatibility with hosts that send it. Not enforced.
    pub timeout: Option<f64>,
}

impl PositionOptions {
    /// The accuracy tier to configure on the source.
    #[must_use]
    pub fn desired_accuracy(&self) -> Accuracy {
        self.accuracy
            .unwrap_or_else(|| Accuracy::from_high_accuracy(self.enable_high_accuracy))
    }

    /// Whether `fix` is recent enough to answer this request at `now_ms`.
    #[must_use]
    pub fn accepts_cached(&self, fix: &LocationFix, now_ms: f64) -> bool {
        self.maximum_age
            .is_none_or(|maximum_age| fix.age(now_ms) < maximum_age)
    }
}

/// Options for continuous location updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateOptions {
    /// Minimum movement in meters between updates.
    pub distance_filter: f64,
    /// Request the best accuracy tier.
    pub enable_high_accuracy: bool,
    /// Explicit accuracy tier, overriding `enable_high_accuracy`.
    pub accuracy: Option<Accuracy>,
    /// Use coarse significant-change monitoring instead of continuous updates.
    pub use_significant_changes: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            distance_filter: DEFAULT_UPDATE_DISTANCE_FILTER,
            enable_high_accuracy: false,
            accuracy: None,
            use_significant_changes: false,
        }
    }
}

impl UpdateOptions {
    /// The accuracy tier to configure on the source.
    #[must_use]
    pub fn desired_accuracy(&self) -> Accuracy {
        self.accuracy
            .unwrap_or_else(|| Accuracy::from_high_accuracy(self.enable_high_accuracy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coords;

    fn fix_at(timestamp: f64) -> LocationFix {
        LocationFix {
            coords: Coords {
                latitude: 0.0,
                longitude: 0.0,
                altitude: 0.0,
                accuracy: 10.0,
                altitude_accuracy: -1.0,
                heading: -1.0,
                speed: -1.0,
            },
            timestamp,
        }
    }

    #[test]
    fn empty_map_uses_defaults() {
        let position: PositionOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(position, PositionOptions::default());
        assert_eq!(position.desired_accuracy(), Accuracy::HundredMeters);

        let update: UpdateOptions = serde_json::from_str("{}").unwrap();
        assert!((update.distance_filter - 100.0).abs() < f64::EPSILON);
        assert!(!update.use_significant_changes);
    }

    #[test]
    fn reads_camel_case_fields() {
        let options: PositionOptions = serde_json::from_str(
            r#"{"enableHighAccuracy": true, "maximumAge": 5000, "distanceFilter": 25, "timeout": 1000}"#,
        )
        .unwrap();

        assert_eq!(options.desired_accuracy(), Accuracy::Best);
        assert_eq!(options.maximum_age, Some(5000.0));
        assert_eq!(options.distance_filter, Some(25.0));
    }

    #[test]
    fn explicit_accuracy_wins() {
        let options: UpdateOptions =
            serde_json::from_str(r#"{"enableHighAccuracy": true, "accuracy": "kilometer"}"#)
                .unwrap();
        assert_eq!(options.desired_accuracy(), Accuracy::Kilometer);
    }

    #[test]
    fn cache_window_is_exclusive() {
        let options = PositionOptions {
            maximum_age: Some(1_000.0),
            ..PositionOptions::default()
        };
        let fix = fix_at(10_000.0);

        assert!(options.accepts_cached(&fix, 10_999.0));
        assert!(!options.accepts_cached(&fix, 11_000.0));
        assert!(PositionOptions::default().accepts_cached(&fix, f64::MAX));
    }
}
