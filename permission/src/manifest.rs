//! Usage-description keys the host application must declare.
//!
//! Platforms refuse to show the authorization prompt when the matching
//! usage description is missing from the application manifest. The check
//! here is purely diagnostic: it logs in debug builds and never fails a
//! request.

use std::collections::HashMap;

use log::error;
use serde::Deserialize;

use crate::AuthorizationLevel;

/// Manifest key required for when-in-use authorization.
pub const WHEN_IN_USE_KEY: &str = "NSLocationWhenInUseUsageDescription";
/// Manifest key required for always authorization.
pub const ALWAYS_KEY: &str = "NSLocationAlwaysAndWhenInUseUsageDescription";

/// Usage-description strings read from the application manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct UsageDescriptions {
    entries: HashMap<String, String>,
}

impl UsageDescriptions {
    /// Parses the manifest from its JSON representation.
    ///
    /// Non-string values are rejected; unrelated keys are kept but ignored.
    ///
    /// # Errors
    ///
    /// Returns the parse error when `json` is not an object of strings.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Adds or replaces a single manifest entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, description: impl Into<String>) -> Self {
        self.entries.insert(key.into(), description.into());
        self
    }

    /// The manifest key `level` depends on.
    #[must_use]
    pub const fn required_key(level: AuthorizationLevel) -> &'static str {
        match level {
            AuthorizationLevel::WhenInUse => WHEN_IN_USE_KEY,
            AuthorizationLevel::Always => ALWAYS_KEY,
        }
    }

    /// Whether a non-empty description exists for `level`.
    #[must_use]
    pub fn declares(&self, level: AuthorizationLevel) -> bool {
        self.entries
            .get(Self::required_key(level))
            .is_some_and(|description| !description.trim().is_empty())
    }

    /// Logs an error in debug builds when the description for `level` is missing.
    ///
    /// Returns whether the key is present so callers can test the outcome.
    pub fn check(&self, level: AuthorizationLevel) -> bool {
        let declared = self.declares(level);
        if cfg!(debug_assertions) && !declared {
            error!(
                "{} is missing from the application manifest; the {level} authorization prompt will not be shown",
                Self::required_key(level)
            );
        }
        declared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_keys_from_manifest_json() {
        let manifest = UsageDescriptions::from_json(
            r#"{"NSLocationWhenInUseUsageDescription": "Show nearby stops", "CFBundleName": "Transit"}"#,
        )
        .unwrap();

        assert!(manifest.declares(AuthorizationLevel::WhenInUse));
        assert!(!manifest.declares(AuthorizationLevel::Always));
    }

    #[test]
    fn blank_description_counts_as_missing() {
        let manifest = UsageDescriptions::default().with(ALWAYS_KEY, "  ");
        assert!(!manifest.check(AuthorizationLevel::Always));
    }

    #[test]
    fn rejects_non_string_values() {
        assert!(UsageDescriptions::from_json(r#"{"NSLocationWhenInUseUsageDescription": 3}"#).is_err());
    }
}
