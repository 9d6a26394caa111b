use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;
use geobridge_permission::{
    AuthorizationLevel, AuthorizationStatus, PlatformAuthorization, UsageDescriptions,
};
use log::{debug, warn};

use crate::{
    BridgeError, BridgeEvent, BridgeResult, Clock, EventEmitter, LocationFix, LocationPlatform,
    LocationSource, PlatformError, PositionError, PositionOptions, SourceId, SystemClock,
    UpdateOptions,
};

type SuccessHandler = Box<dyn FnOnce(LocationFix)>;
type ErrorHandler = Box<dyn FnOnce(PositionError)>;
type AuthorizationResolver = Box<dyn FnOnce(AuthorizationStatus)>;

const SHARED_SOURCE: SourceId = SourceId::new(0);

/// Whether continuous updates are running, and in which mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservationState {
    /// Updates are running on the shared source.
    pub is_observing: bool,
    /// The running (or last run) mode is significant-change monitoring.
    pub uses_significant_changes: bool,
}

struct PendingPosition {
    on_success: SuccessHandler,
    on_error: ErrorHandler,
    source: SourceId,
}

/// Resolves once the platform has decided on an authorization request.
///
/// Yields [`BridgeError::Abandoned`] when a newer request replaced this one
/// or the bridge was torn down first.
#[derive(Debug)]
#[must_use = "authorization requests do nothing unless awaited"]
pub struct AuthorizationRequest {
    receiver: oneshot::Receiver<AuthorizationStatus>,
}

impl Future for AuthorizationRequest {
    type Output = BridgeResult<AuthorizationStatus>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.receiver
            .poll_unpin(cx)
            .map(|result| result.map_err(|_| BridgeError::Abandoned))
    }
}

/// Adapter between a platform location stack and a host runtime.
///
/// The bridge owns one shared source used for continuous updates and creates
/// a transient source for each one-shot request, so a one-shot fetch never
/// disturbs a running subscription. All methods run on the host's callback
/// thread; platform callbacks are fed back in through [`Self::on_location`],
/// [`Self::on_error`] and [`Self::on_authorization_changed`].
///
/// At most one one-shot request and one authorization request are pending at
/// a time. A second request replaces the first: the replaced handlers are
/// dropped without being called.
pub struct LocationBridge<P, E, C = SystemClock>
where
    P: LocationPlatform,
    E: EventEmitter,
    C: Clock,
{
    platform: P,
    emitter: E,
    clock: C,
    manifest: Option<UsageDescriptions>,
    shared: P::Source,
    transients: Vec<(SourceId, P::Source)>,
    next_source: u64,
    cached_fix: Option<LocationFix>,
    pending_position: Option<PendingPosition>,
    pending_authorization: Option<AuthorizationResolver>,
    observation: ObservationState,
    has_active_listeners: bool,
    torn_down: bool,
}

impl<P, E, C> fmt::Debug for LocationBridge<P, E, C>
where
    P: LocationPlatform,
    E: EventEmitter,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationBridge")
            .field("observation", &self.observation)
            .field("has_active_listeners", &self.has_active_listeners)
            .field("cached_fix", &self.cached_fix)
            .field(
                "pending_position",
                &self.pending_position.as_ref().map(|pending| pending.source),
            )
            .field(
                "pending_authorization",
                &self.pending_authorization.is_some(),
            )
            .field("transients", &self.transients.len())
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl<P, E> LocationBridge<P, E, SystemClock>
where
    P: LocationPlatform,
    E: EventEmitter,
{
    /// Creates a bridge using wall-clock time for cache checks.
    pub fn new(platform: P, emitter: E) -> Self {
        Self::with_clock(platform, emitter, SystemClock)
    }
}

impl<P, E, C> LocationBridge<P, E, C>
where
    P: LocationPlatform,
    E: EventEmitter,
    C: Clock,
{
    /// Creates a bridge with a custom clock.
    pub fn with_clock(mut platform: P, emitter: E, clock: C) -> Self {
        let shared = platform.create_source(SHARED_SOURCE);
        Self {
            platform,
            emitter,
            clock,
            manifest: None,
            shared,
            transients: Vec::new(),
            next_source: SHARED_SOURCE.get() + 1,
            cached_fix: None,
            pending_position: None,
            pending_authorization: None,
            observation: ObservationState::default(),
            has_active_listeners: false,
            torn_down: false,
        }
    }

    /// Attaches the application manifest so debug builds can flag missing
    /// usage descriptions before prompting.
    #[must_use]
    pub fn with_manifest(mut self, manifest: UsageDescriptions) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Identity of the shared continuous-observation source.
    #[must_use]
    pub const fn shared_source(&self) -> SourceId {
        SHARED_SOURCE
    }

    /// Current observation state.
    #[must_use]
    pub const fn observation(&self) -> ObservationState {
        self.observation
    }

    /// Whether stream listeners are attached.
    #[must_use]
    pub const fn has_active_listeners(&self) -> bool {
        self.has_active_listeners
    }

    /// The fix most recently delivered to a one-shot request.
    #[must_use]
    pub const fn cached_fix(&self) -> Option<&LocationFix> {
        self.cached_fix.as_ref()
    }

    /// Whether a one-shot request is waiting for the platform.
    #[must_use]
    pub const fn has_pending_position(&self) -> bool {
        self.pending_position.is_some()
    }

    /// Whether an authorization request is waiting for the platform.
    #[must_use]
    pub const fn has_pending_authorization(&self) -> bool {
        self.pending_authorization.is_some()
    }

    /// The underlying platform.
    #[must_use]
    pub const fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable access to the underlying platform.
    pub const fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// The event emitter.
    #[must_use]
    pub const fn emitter(&self) -> &E {
        &self.emitter
    }

    /// Requests location authorization and returns a future for the outcome.
    pub fn request_authorization(&mut self, level: AuthorizationLevel) -> AuthorizationRequest {
        let (sender, receiver) = oneshot::channel();
        self.request_authorization_with(level, move |status| {
            if sender.send(status).is_err() {
                debug!("authorization result {status} has no receiver");
            }
        });
        AuthorizationRequest { receiver }
    }

    /// Requests location authorization and reports the outcome to `resolver`.
    ///
    /// Resolves immediately when services are disabled or the user already
    /// decided. Otherwise the resolver waits for
    /// [`Self::on_authorization_changed`].
    pub fn request_authorization_with<F>(&mut self, level: AuthorizationLevel, resolver: F)
    where
        F: FnOnce(AuthorizationStatus) + 'static,
    {
        if !self.platform.services_enabled() {
            resolver(AuthorizationStatus::Disabled);
            return;
        }

        if let Some(status) = self.platform.authorization().status() {
            resolver(status);
            return;
        }

        if let Some(manifest) = &self.manifest {
            manifest.check(level);
        }

        if self.pending_authorization.replace(Box::new(resolver)).is_some() {
            warn!("authorization request replaced an unanswered one");
        }
        debug!("prompting for {level} authorization");
        self.platform.request_authorization(level);
    }

    /// Platform callback: the authorization state changed.
    pub fn on_authorization_changed(&mut self, state: PlatformAuthorization) {
        let Some(status) = state.status() else {
            return;
        };
        if let Some(resolver) = self.pending_authorization.take() {
            resolver(status);
        }
    }

    /// Fetches a single position.
    ///
    /// A cached fix younger than `maximum_age` is delivered synchronously
    /// without touching the platform. The `timeout` option is not enforced.
    pub fn get_current_position<S, F>(&mut self, options: PositionOptions, on_success: S, on_error: F)
    where
        S: FnOnce(LocationFix) + 'static,
        F: FnOnce(PositionError) + 'static,
    {
        let now = self.clock.now_millis();
        if let Some(fix) = self
            .cached_fix
            .filter(|fix| options.accepts_cached(fix, now))
        {
            debug!("answering position request from cache");
            on_success(fix);
            return;
        }

        if let Some(timeout) = options.timeout {
            debug!("position request timeout of {timeout}ms is not enforced");
        }

        let id = self.allocate_source();
        let mut source = self.platform.create_source(id);
        source.configure(options.desired_accuracy(), options.distance_filter);
        source.request_location();
        self.transients.push((id, source));

        let pending = PendingPosition {
            on_success: Box::new(on_success),
            on_error: Box::new(on_error),
            source: id,
        };
        if let Some(replaced) = self.pending_position.replace(pending) {
            warn!(
                "position request on source {id} replaced the pending request on source {}",
                replaced.source
            );
        }
    }

    /// Starts continuous updates on the shared source.
    pub fn start_location_update(&mut self, options: UpdateOptions) {
        if self.observation.is_observing
            && self.observation.uses_significant_changes != options.use_significant_changes
        {
            debug!("switching observation mode");
            self.stop_shared();
        }

        self.shared
            .configure(options.desired_accuracy(), Some(options.distance_filter));
        if options.use_significant_changes {
            self.shared.start_monitoring_significant_changes();
        } else {
            self.shared.start_updating();
        }

        self.observation = ObservationState {
            is_observing: true,
            uses_significant_changes: options.use_significant_changes,
        };
    }

    /// Stops continuous updates in whichever mode was last started.
    pub fn stop_location_update(&mut self) {
        self.stop_shared();
        self.observation.is_observing = false;
    }

    /// A stream listener attached.
    pub const fn start_observing(&mut self) {
        self.has_active_listeners = true;
    }

    /// The last stream listener detached.
    pub const fn stop_observing(&mut self) {
        self.has_active_listeners = false;
    }

    /// Platform callback: `source` produced a fix.
    pub fn on_location(&mut self, source: SourceId, fix: LocationFix) {
        if !self.is_live(source) {
            debug!("ignoring fix from detached source {source}");
            return;
        }

        if self.routes_to_stream(source) {
            self.emitter.emit(BridgeEvent::LocationChanged(fix));
            return;
        }

        match self.take_pending(source) {
            Some(pending) => {
                self.cached_fix = Some(fix);
                (pending.on_success)(fix);
            }
            None => debug!("dropping fix from source {source}: nothing is waiting for it"),
        }
    }

    /// Platform callback: `source` failed.
    pub fn on_error(&mut self, source: SourceId, error: &PlatformError) {
        if !self.is_live(source) {
            debug!("ignoring error from detached source {source}");
            return;
        }

        let error = PositionError::from_platform(error, self.platform.services_enabled());

        if self.routes_to_stream(source) {
            self.emitter.emit(BridgeEvent::LocationError(error));
            return;
        }

        match self.take_pending(source) {
            Some(pending) => (pending.on_error)(error),
            None => debug!("dropping error from source {source}: {error}"),
        }
    }

    /// Stops observation and detaches every source. Pending requests are
    /// dropped unanswered. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        if self.observation.is_observing {
            self.stop_location_update();
        }
        self.shared.detach();
        for (_, mut source) in self.transients.drain(..) {
            source.detach();
        }
        self.pending_position = None;
        self.pending_authorization = None;
        self.torn_down = true;
    }

    const fn allocate_source(&mut self) -> SourceId {
        let id = SourceId::new(self.next_source);
        self.next_source += 1;
        id
    }

    fn is_live(&self, source: SourceId) -> bool {
        !self.torn_down
            && (source == SHARED_SOURCE || self.transients.iter().any(|(id, _)| *id == source))
    }

    fn routes_to_stream(&self, source: SourceId) -> bool {
        source == SHARED_SOURCE && self.has_active_listeners && self.observation.is_observing
    }

    fn stop_shared(&mut self) {
        if self.observation.uses_significant_changes {
            self.shared.stop_monitoring_significant_changes();
        } else {
            self.shared.stop_updating();
        }
    }

    /// Clears the pending slot and releases the transient sources involved:
    /// the one that delivered and the one the pending request was issued on.
    fn take_pending(&mut self, delivering: SourceId) -> Option<PendingPosition> {
        self.release_transient(delivering);
        let pending = self.pending_position.take()?;
        self.release_transient(pending.source);
        Some(pending)
    }

    fn release_transient(&mut self, id: SourceId) {
        if let Some(index) = self.transients.iter().position(|(source, _)| *source == id) {
            let (_, mut source) = self.transients.swap_remove(index);
            source.detach();
        }
    }
}

impl<P, E, C> Drop for LocationBridge<P, E, C>
where
    P: LocationPlatform,
    E: EventEmitter,
    C: Clock,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
