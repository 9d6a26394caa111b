//! Location bridge for cross-platform application runtimes.
//!
//! [`LocationBridge`] sits between a platform location stack (behind the
//! [`LocationPlatform`] trait) and a host runtime. It answers three kinds of
//! requests:
//!
//! - authorization, resolved once the user decides;
//! - one-shot positions, optionally served from a cached fix;
//! - continuous updates, emitted as [`BridgeEvent`]s while listeners are
//!   attached.
//!
//! ```ignore
//! let (emitter, events) = ChannelEmitter::new();
//! let mut bridge = LocationBridge::new(platform, emitter);
//!
//! bridge.start_observing();
//! bridge.start_location_update(UpdateOptions::default());
//! while let Ok(event) = events.recv().await {
//!     host.send_event(event.name(), event.payload());
//! }
//! ```

#![warn(missing_docs)]

mod bridge;
mod clock;
mod error;
mod event;
mod fix;
pub mod host;
mod options;
mod platform;

pub use bridge::{AuthorizationRequest, LocationBridge, ObservationState};
pub use clock::{Clock, SystemClock};
pub use error::{BridgeError, BridgeResult, ErrorCode, PlatformError, PositionError};
pub use event::{BridgeEvent, ChannelEmitter, EventEmitter, LOCATION_CHANGED, LOCATION_ERROR};
pub use fix::{Coords, LocationFix};
pub use geobridge_permission::{
    AuthorizationLevel, AuthorizationStatus, PlatformAuthorization, UsageDescriptions,
};
pub use host::{HostCommand, Reply};
pub use options::{Accuracy, DEFAULT_UPDATE_DISTANCE_FILTER, PositionOptions, UpdateOptions};
pub use platform::{LocationPlatform, LocationSource, SourceId};
