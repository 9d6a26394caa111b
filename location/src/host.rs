//! String-keyed command surface for host runtimes.
//!
//! Hosts that speak JSON across their bridge decode a method name plus an
//! argument value into a [`HostCommand`] and hand it to
//! [`LocationBridge::invoke`], which answers through a single [`Reply`].

use std::cell::RefCell;
use std::rc::Rc;

use geobridge_permission::AuthorizationLevel;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    BridgeError, BridgeResult, Clock, EventEmitter, LocationBridge, LocationPlatform,
    PositionOptions, UpdateOptions,
};

/// Method names exposed to the host.
pub mod methods {
    /// Ask for location authorization.
    pub const REQUEST_AUTHORIZATION: &str = "requestAuthorization";
    /// Fetch a single position.
    pub const GET_CURRENT_POSITION: &str = "getCurrentPosition";
    /// Begin continuous updates.
    pub const START_LOCATION_UPDATE: &str = "startLocationUpdate";
    /// End continuous updates.
    pub const STOP_LOCATION_UPDATE: &str = "stopLocationUpdate";
    /// A stream listener attached.
    pub const START_OBSERVING: &str = "startObserving";
    /// The last stream listener detached.
    pub const STOP_OBSERVING: &str = "stopObserving";
}

/// A decoded bridge call.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// `requestAuthorization(level)`
    RequestAuthorization(AuthorizationLevel),
    /// `getCurrentPosition(options)`
    GetCurrentPosition(PositionOptions),
    /// `startLocationUpdate(options)`
    StartLocationUpdate(UpdateOptions),
    /// `stopLocationUpdate()`
    StopLocationUpdate,
    /// `startObserving()`
    StartObserving,
    /// `stopObserving()`
    StopObserving,
}

#[derive(Deserialize)]
struct Envelope {
    method: String,
    #[serde(default)]
    args: Value,
}

impl HostCommand {
    /// Decodes a call from its method name and argument value.
    ///
    /// Missing or `null` options decode to the defaults.
    ///
    /// # Errors
    ///
    /// Fails on unknown methods, unknown authorization levels, or arguments
    /// that do not match the method's shape.
    pub fn parse(method: &str, args: Value) -> BridgeResult<Self> {
        match method {
            methods::REQUEST_AUTHORIZATION => {
                let level: String = decode(method, args)?;
                level.parse().map(Self::RequestAuthorization).map_err(|err| {
                    warn!("{method} ignored: {err}");
                    BridgeError::from(err)
                })
            }
            methods::GET_CURRENT_POSITION => {
                decode_or_default(method, args).map(Self::GetCurrentPosition)
            }
            methods::START_LOCATION_UPDATE => {
                decode_or_default(method, args).map(Self::StartLocationUpdate)
            }
            methods::STOP_LOCATION_UPDATE => Ok(Self::StopLocationUpdate),
            methods::START_OBSERVING => Ok(Self::StartObserving),
            methods::STOP_OBSERVING => Ok(Self::StopObserving),
            other => Err(BridgeError::UnknownMethod(other.to_owned())),
        }
    }

    /// Decodes a `{"method": ..., "args": ...}` message.
    ///
    /// # Errors
    ///
    /// Fails when the envelope is malformed or [`Self::parse`] rejects it.
    pub fn from_json(message: &str) -> BridgeResult<Self> {
        let envelope: Envelope =
            serde_json::from_str(message).map_err(|source| BridgeError::InvalidArguments {
                method: String::from("<envelope>"),
                source,
            })?;
        Self::parse(&envelope.method, envelope.args)
    }
}

fn decode<T: for<'de> Deserialize<'de>>(method: &str, args: Value) -> BridgeResult<T> {
    serde_json::from_value(args).map_err(|source| BridgeError::InvalidArguments {
        method: method.to_owned(),
        source,
    })
}

fn decode_or_default<T>(method: &str, args: Value) -> BridgeResult<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    if args.is_null() {
        Ok(T::default())
    } else {
        decode(method, args)
    }
}

/// Outcome of a bridge call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The call succeeded with this value.
    Resolved(Value),
    /// The call failed with this error object.
    Rejected(Value),
}

impl Reply {
    fn resolved<T: Serialize>(value: &T) -> Self {
        Self::Resolved(serde_json::to_value(value).unwrap_or_default())
    }

    fn rejected<T: Serialize>(value: &T) -> Self {
        Self::Rejected(serde_json::to_value(value).unwrap_or_default())
    }
}

impl<P, E, C> LocationBridge<P, E, C>
where
    P: LocationPlatform,
    E: EventEmitter,
    C: Clock,
{
    /// Runs a decoded command. `reply` is called at most once, possibly
    /// after this method returns.
    pub fn invoke<R>(&mut self, command: HostCommand, reply: R)
    where
        R: FnOnce(Reply) + 'static,
    {
        match command {
            HostCommand::RequestAuthorization(level) => {
                self.request_authorization_with(level, move |status| {
                    reply(Reply::resolved(&status));
                });
            }
            HostCommand::GetCurrentPosition(options) => {
                let on_success = Rc::new(RefCell::new(Some(reply)));
                let on_error = Rc::clone(&on_success);
                self.get_current_position(
                    options,
                    move |fix| {
                        let reply = on_success.borrow_mut().take();
                        if let Some(reply) = reply {
                            reply(Reply::resolved(&fix));
                        }
                    },
                    move |error| {
                        let reply = on_error.borrow_mut().take();
                        if let Some(reply) = reply {
                            reply(Reply::rejected(&error));
                        }
                    },
                );
            }
            HostCommand::StartLocationUpdate(options) => {
                self.start_location_update(options);
                reply(Reply::Resolved(Value::Null));
            }
            HostCommand::StopLocationUpdate => {
                self.stop_location_update();
                reply(Reply::Resolved(Value::Null));
            }
            HostCommand::StartObserving => {
                self.start_observing();
                reply(Reply::Resolved(Value::Null));
            }
            HostCommand::StopObserving => {
                self.stop_observing();
                reply(Reply::Resolved(Value::Null));
            }
        }
    }

    /// Decodes and runs a call in one step.
    ///
    /// # Errors
    ///
    /// Returns the decoding error without calling `reply`.
    pub fn dispatch<R>(&mut self, method: &str, args: Value, reply: R) -> BridgeResult<()>
    where
        R: FnOnce(Reply) + 'static,
    {
        let command = HostCommand::parse(method, args)?;
        self.invoke(command, reply);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_authorization_levels() {
        assert_eq!(
            HostCommand::parse(methods::REQUEST_AUTHORIZATION, json!("always")).unwrap(),
            HostCommand::RequestAuthorization(AuthorizationLevel::Always)
        );
        assert!(matches!(
            HostCommand::parse(methods::REQUEST_AUTHORIZATION, json!("forever")),
            Err(BridgeError::UnknownAuthorizationLevel(_))
        ));
    }

    #[test]
    fn null_options_mean_defaults() {
        assert_eq!(
            HostCommand::parse(methods::START_LOCATION_UPDATE, Value::Null).unwrap(),
            HostCommand::StartLocationUpdate(UpdateOptions::default())
        );
        assert_eq!(
            HostCommand::from_json(r#"{"method": "getCurrentPosition"}"#).unwrap(),
            HostCommand::GetCurrentPosition(PositionOptions::default())
        );
    }

    #[test]
    fn rejects_malformed_calls() {
        assert!(matches!(
            HostCommand::parse("watchHeading", Value::Null),
            Err(BridgeError::UnknownMethod(name)) if name == "watchHeading"
        ));
        assert!(matches!(
            HostCommand::parse(methods::GET_CURRENT_POSITION, json!({"maximumAge": "soon"})),
            Err(BridgeError::InvalidArguments { .. })
        ));
    }
}
