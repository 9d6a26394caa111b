//! The seam between the bridge and the platform location stack.
//!
//! A host implements [`LocationPlatform`] over its native API. Every source
//! it hands out is tagged with the [`SourceId`] the bridge chose, and the host
//! reports callbacks back through [`LocationBridge::on_location`] and
//! [`LocationBridge::on_error`] with that same id.
//!
//! [`LocationBridge::on_location`]: crate::LocationBridge::on_location
//! [`LocationBridge::on_error`]: crate::LocationBridge::on_error

use std::fmt;

use geobridge_permission::{AuthorizationLevel, PlatformAuthorization};

use crate::Accuracy;

/// Identity of a location source handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    /// Wraps a raw handle value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value, e.g. for passing across an FFI boundary.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single platform location source handle.
pub trait LocationSource {
    /// Sets the desired accuracy and distance filter (`None` means no filter).
    fn configure(&mut self, accuracy: Accuracy, distance_filter: Option<f64>);

    /// Asks for exactly one fix.
    fn request_location(&mut self);

    /// Begins continuous updates.
    fn start_updating(&mut self);

    /// Ends continuous updates.
    fn stop_updating(&mut self);

    /// Begins coarse significant-change monitoring.
    fn start_monitoring_significant_changes(&mut self);

    /// Ends significant-change monitoring.
    fn stop_monitoring_significant_changes(&mut self);

    /// Disconnects the source from the bridge. No callbacks may be reported
    /// for it afterwards.
    fn detach(&mut self);
}

/// Access to the platform location stack.
pub trait LocationPlatform {
    /// Source handles produced by this platform.
    type Source: LocationSource;

    /// Whether location services are switched on device-wide.
    fn services_enabled(&self) -> bool;

    /// Current authorization state for this application.
    fn authorization(&self) -> PlatformAuthorization;

    /// Shows the platform permission prompt for `level`. The answer arrives
    /// later through [`LocationBridge::on_authorization_changed`].
    ///
    /// [`LocationBridge::on_authorization_changed`]: crate::LocationBridge::on_authorization_changed
    fn request_authorization(&mut self, level: AuthorizationLevel);

    /// Creates a new, independent source reporting under `id`.
    fn create_source(&mut self, id: SourceId) -> Self::Source;
}
