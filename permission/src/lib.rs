//! Location authorization types shared by the geobridge crates.
//!
//! The platform reports its raw authorization state as a
//! [`PlatformAuthorization`]; the bridge surface only ever exposes the
//! collapsed [`AuthorizationStatus`]. Callers ask for one of two
//! [`AuthorizationLevel`]s.

#![warn(missing_docs)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod manifest;

pub use manifest::UsageDescriptions;

/// The level of location access an application asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationLevel {
    /// Access only while the application is in the foreground.
    WhenInUse,
    /// Access at any time, including in the background.
    Always,
}

impl AuthorizationLevel {
    /// The string the host runtime uses for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WhenInUse => "whenInUse",
            Self::Always => "always",
        }
    }
}

impl fmt::Display for AuthorizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a host passes an authorization level we do not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized authorization level: {0:?}")]
pub struct UnknownLevel(pub String);

impl FromStr for AuthorizationLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whenInUse" => Ok(Self::WhenInUse),
            "always" => Ok(Self::Always),
            other => Err(UnknownLevel(other.to_owned())),
        }
    }
}

/// Authorization outcome reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationStatus {
    /// Location services are switched off device-wide.
    Disabled,
    /// Access was granted, either while in use or always.
    Granted,
    /// The user denied access.
    Denied,
    /// Access is restricted (e.g., parental controls).
    Restricted,
}

impl AuthorizationStatus {
    /// The string the host runtime receives for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Restricted => "restricted",
        }
    }
}

impl fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw authorization state as the platform reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformAuthorization {
    /// The user has not been asked yet.
    NotDetermined,
    /// Access is restricted and cannot be changed by the user.
    Restricted,
    /// The user denied access.
    Denied,
    /// Access granted at any time.
    AuthorizedAlways,
    /// Access granted while the application is in use.
    AuthorizedWhenInUse,
}

impl PlatformAuthorization {
    /// Collapse the platform state into the status reported to the host.
    ///
    /// Returns `None` while the decision is still pending.
    #[must_use]
    pub const fn status(self) -> Option<AuthorizationStatus> {
        match self {
            Self::NotDetermined => None,
            Self::Restricted => Some(AuthorizationStatus::Restricted),
            Self::Denied => Some(AuthorizationStatus::Denied),
            Self::AuthorizedAlways | Self::AuthorizedWhenInUse => {
                Some(AuthorizationStatus::Granted)
            }
        }
    }

    /// Whether the user has made a decision.
    #[must_use]
    pub const fn is_determined(self) -> bool {
        !matches!(self, Self::NotDetermined)
    }
}
