//! Stream events sent to subscribed listeners.

use async_channel::{Receiver, Sender, unbounded};
use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::{LocationFix, PositionError};

/// Event name for new fixes.
pub const LOCATION_CHANGED: &str = "locationChanged";
/// Event name for failures during continuous observation.
pub const LOCATION_ERROR: &str = "locationError";

/// An event emitted while continuous observation has listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum BridgeEvent {
    /// A new fix arrived.
    #[serde(rename = "locationChanged")]
    LocationChanged(LocationFix),
    /// The source reported a failure.
    #[serde(rename = "locationError")]
    LocationError(PositionError),
}

impl BridgeEvent {
    /// The event name the host emitter expects.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LocationChanged(_) => LOCATION_CHANGED,
            Self::LocationError(_) => LOCATION_ERROR,
        }
    }

    /// The event body as JSON.
    #[must_use]
    pub fn payload(&self) -> Value {
        let encoded = match self {
            Self::LocationChanged(fix) => serde_json::to_value(fix),
            Self::LocationError(error) => serde_json::to_value(error),
        };
        encoded.unwrap_or_default()
    }
}

/// Receives stream events on behalf of the host runtime.
pub trait EventEmitter {
    /// Delivers one event to the host.
    fn emit(&self, event: BridgeEvent);
}

/// Emitter that queues events on an async channel for a host task to drain.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    sender: Sender<BridgeEvent>,
}

impl ChannelEmitter {
    /// Creates an emitter and the receiving end of its channel.
    #[must_use]
    pub fn new() -> (Self, Receiver<BridgeEvent>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }
}

impl EventEmitter for ChannelEmitter {
    fn emit(&self, event: BridgeEvent) {
        if let Err(err) = self.sender.try_send(event) {
            let reason = if err.is_closed() { "closed" } else { "full" };
            warn!("dropping {} event: channel {reason}", err.into_inner().name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    #[tokio::test]
    async fn channel_emitter_forwards_events() {
        let (emitter, receiver) = ChannelEmitter::new();
        let error = PositionError::new(ErrorCode::PositionUnavailable, "Unable to retrieve location");

        emitter.emit(BridgeEvent::LocationError(error.clone()));

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.name(), LOCATION_ERROR);
        assert_eq!(event, BridgeEvent::LocationError(error));
    }

    #[test]
    fn closed_channel_drops_quietly() {
        let (emitter, receiver) = ChannelEmitter::new();
        drop(receiver);

        emitter.emit(BridgeEvent::LocationError(PositionError::new(
            ErrorCode::PermissionDenied,
            "Location permission denied",
        )));
    }

    #[test]
    fn payload_is_the_bare_body() {
        let error = PositionError::new(ErrorCode::PermissionDenied, "Location permission denied");
        let event = BridgeEvent::LocationError(error);
        assert_eq!(event.payload()["code"], 1);
    }
}
