//! # Geobridge
//!
//! Location services for cross-platform application runtimes, exposed
//! through a small bridge surface: authorization, one-shot positions and
//! continuous updates.
//!
//! ## Features
//!
//! - `location` (default): the [`location::LocationBridge`] adapter.
//! - `permission`: authorization levels, statuses and manifest checks.
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! geobridge = { version = "0.1", features = ["full"] }
//! ```
//!
//! ```rust,ignore
//! use geobridge::location::{LocationBridge, PositionOptions};
//!
//! let mut bridge = LocationBridge::new(platform, emitter);
//! bridge.get_current_position(
//!     PositionOptions::default(),
//!     |fix| println!("Latitude: {}, Longitude: {}", fix.coords.latitude, fix.coords.longitude),
//!     |err| eprintln!("{err}"),
//! );
//! ```

#[cfg(feature = "location")]
pub use geobridge_location as location;

#[cfg(feature = "permission")]
pub use geobridge_permission as permission;
