#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use geobridge_location::{
    Accuracy, AuthorizationLevel, BridgeEvent, Clock, Coords, EventEmitter, LocationBridge,
    LocationFix, LocationPlatform, LocationSource, PlatformAuthorization, SourceId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SourceCall {
    Configure(Accuracy, Option<f64>),
    RequestLocation,
    StartUpdating,
    StopUpdating,
    StartSignificant,
    StopSignificant,
    Detach,
}

pub type CallLog = Rc<RefCell<Vec<(SourceId, SourceCall)>>>;

#[derive(Debug)]
pub struct FakeSource {
    id: SourceId,
    log: CallLog,
}

impl FakeSource {
    fn record(&self, call: SourceCall) {
        self.log.borrow_mut().push((self.id, call));
    }
}

impl LocationSource for FakeSource {
    fn configure(&mut self, accuracy: Accuracy, distance_filter: Option<f64>) {
        self.record(SourceCall::Configure(accuracy, distance_filter));
    }

    fn request_location(&mut self) {
        self.record(SourceCall::RequestLocation);
    }

    fn start_updating(&mut self) {
        self.record(SourceCall::StartUpdating);
    }

    fn stop_updating(&mut self) {
        self.record(SourceCall::StopUpdating);
    }

    fn start_monitoring_significant_changes(&mut self) {
        self.record(SourceCall::StartSignificant);
    }

    fn stop_monitoring_significant_changes(&mut self) {
        self.record(SourceCall::StopSignificant);
    }

    fn detach(&mut self) {
        self.record(SourceCall::Detach);
    }
}

#[derive(Debug)]
pub struct FakePlatform {
    pub services_enabled: bool,
    pub authorization: PlatformAuthorization,
    pub prompts: Vec<AuthorizationLevel>,
    pub created: Vec<SourceId>,
    pub log: CallLog,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            services_enabled: true,
            authorization: PlatformAuthorization::AuthorizedWhenInUse,
            prompts: Vec::new(),
            created: Vec::new(),
            log: CallLog::default(),
        }
    }

    pub fn calls_on(&self, id: SourceId) -> Vec<SourceCall> {
        self.log
            .borrow()
            .iter()
            .filter(|(source, _)| *source == id)
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn last_created(&self) -> SourceId {
        *self.created.last().expect("no source created")
    }
}

impl LocationPlatform for FakePlatform {
    type Source = FakeSource;

    fn services_enabled(&self) -> bool {
        self.services_enabled
    }

    fn authorization(&self) -> PlatformAuthorization {
        self.authorization
    }

    fn request_authorization(&mut self, level: AuthorizationLevel) {
        self.prompts.push(level);
    }

    fn create_source(&mut self, id: SourceId) -> FakeSource {
        self.created.push(id);
        FakeSource {
            id,
            log: Rc::clone(&self.log),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingEmitter {
    events: Rc<RefCell<Vec<BridgeEvent>>>,
}

impl RecordingEmitter {
    pub fn events(&self) -> Vec<BridgeEvent> {
        self.events.borrow().clone()
    }
}

impl EventEmitter for RecordingEmitter {
    fn emit(&self, event: BridgeEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> f64 {
        self.now.get()
    }
}

pub type TestBridge = LocationBridge<FakePlatform, RecordingEmitter, ManualClock>;

pub fn bridge() -> (TestBridge, RecordingEmitter, ManualClock) {
    let emitter = RecordingEmitter::default();
    let clock = ManualClock::default();
    clock.set(1_700_000_000_000.0);
    let bridge = LocationBridge::with_clock(FakePlatform::new(), emitter.clone(), clock.clone());
    (bridge, emitter, clock)
}

pub fn fix(latitude: f64, longitude: f64, timestamp: f64) -> LocationFix {
    LocationFix {
        coords: Coords {
            latitude,
            longitude,
            altitude: 12.5,
            accuracy: 8.0,
            altitude_accuracy: 4.0,
            heading: 90.0,
            speed: 1.5,
        },
        timestamp,
    }
}

/// Collects what a one-shot request's handlers received.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    values: Rc<RefCell<Vec<T>>>,
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Self {
            values: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: Clone + 'static> Outcome<T> {
    pub fn handler(&self) -> impl FnOnce(T) + 'static + use<T> {
        let values = Rc::clone(&self.values);
        move |value| values.borrow_mut().push(value)
    }

    pub fn values(&self) -> Vec<T> {
        self.values.borrow().clone()
    }
}
