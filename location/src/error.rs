use geobridge_permission::UnknownLevel;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Failure reported by a platform location source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The platform refused access to location.
    Denied,
    /// A network-based fix could not be obtained.
    Network,
    /// The platform could not determine a location right now.
    LocationUnknown,
    /// Any other platform failure.
    Other(String),
}

/// Numeric error code sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Location permission is missing.
    PermissionDenied = 1,
    /// No position could be produced.
    PositionUnavailable = 2,
    /// Reserved. Nothing produces it since requests carry no deadline.
    Timeout = 3,
}

impl ErrorCode {
    /// The integer the host receives.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Error object delivered to one-shot error handlers and `locationError` events.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct PositionError {
    /// Category of the failure.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
}

impl PositionError {
    /// Creates an error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Maps a platform failure onto the host error taxonomy.
    ///
    /// A denial while services are switched off is reported as unavailable,
    /// since the user cannot fix it by granting permission.
    #[must_use]
    pub fn from_platform(error: &PlatformError, services_enabled: bool) -> Self {
        match error {
            PlatformError::Denied if services_enabled => {
                Self::new(ErrorCode::PermissionDenied, "Location permission denied")
            }
            PlatformError::Denied => Self::new(
                ErrorCode::PositionUnavailable,
                "Location service is turned off",
            ),
            PlatformError::Network => Self::new(
                ErrorCode::PositionUnavailable,
                "Unable to retrieve location due to a network failure",
            ),
            PlatformError::LocationUnknown | PlatformError::Other(_) => Self::new(
                ErrorCode::PositionUnavailable,
                "Unable to retrieve location",
            ),
        }
    }
}

/// Errors raised by the bridge surface itself.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The host asked for an authorization level we do not know.
    #[error(transparent)]
    UnknownAuthorizationLevel(#[from] UnknownLevel),

    /// The host called a method the bridge does not expose.
    #[error("unknown bridge method: {0}")]
    UnknownMethod(String),

    /// The arguments for a method could not be decoded.
    #[error("invalid arguments for {method}: {source}")]
    InvalidArguments {
        /// Method whose arguments failed to decode.
        method: String,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },

    /// A pending request was dropped before the platform answered it,
    /// either because a newer request replaced it or because the bridge
    /// was torn down.
    #[error("request abandoned before the platform answered")]
    Abandoned,
}

/// Result type used across the bridge.
pub type BridgeResult<T> = Result<T, BridgeError>;
