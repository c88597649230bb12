//! Simulated round trips.
//!
//! A [`Simulation`] pairs a minimum latency with a function building the
//! canned reply for a request. An [`Exchange`] drives one panel through
//! idle, pending and resolved, handing out [`SimulatedCall`]s which are owned
//! futures that can be spawned onto a runtime and cancelled.

use crate::types::{ExchangeState, Resolved, SimError};
use log::{debug, trace};
use nanoid::nanoid;
use std::time::Duration;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

/// What a simulated server answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Latency on top of the simulation's minimum delay.
    pub extra_delay: Duration,
    pub body: String,
}

impl Reply {
    pub fn new<S: Into<String>>(body: S) -> Self {
        Self { extra_delay: Duration::from_millis(0), body: body.into() }
    }

    pub fn with_extra_delay(mut self, extra_delay: Duration) -> Self {
        self.extra_delay = extra_delay;
        self
    }
}

type ReplyBuilder<Req> = Box<dyn Fn(&Req) -> Reply + Send + Sync>;

pub struct Simulation<Req> {
    min_delay: Duration,
    builder: ReplyBuilder<Req>,
}

impl<Req> Simulation<Req> {
    pub fn new<F>(min_delay: Duration, builder: F) -> Self
    where
        F: Fn(&Req) -> Reply + Send + Sync + 'static,
    {
        Self { min_delay, builder: Box::new(builder) }
    }

    /// The full delay and body for `request`.
    pub fn reply(&self, request: &Req) -> (Duration, String) {
        let reply = (self.builder)(request);
        (self.min_delay + reply.extra_delay, reply.body)
    }
}

/// The result of a [`SimulatedCall`], tagged with the id of the call
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub request_id: String,
    pub result: Result<Resolved, SimError>,
}

/// A pending round trip. Resolves after its delay unless cancelled first.
#[derive(Debug)]
pub struct SimulatedCall {
    request_id: String,
    delay: Duration,
    body: String,
    started: Instant,
    cancel: CancellationToken,
}

impl SimulatedCall {
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn wait(self) -> Completion {
        let SimulatedCall { request_id, delay, body, started, cancel } = self;

        let result = tokio::select! {
            biased;

            _ = cancel.cancelled() => Err(SimError::Cancelled),
            _ = time::sleep(delay) => {
                Ok(Resolved { response: body, elapsed: started.elapsed() })
            },
        };

        trace!("Simulated call {} finished: {:?}", request_id, result.as_ref().map(|r| r.elapsed));

        Completion { request_id, result }
    }
}

struct InFlight {
    request_id: String,
    cancel: CancellationToken,
}

/// One panel's request/response lifecycle.
pub struct Exchange<Req> {
    simulation: Simulation<Req>,
    state: ExchangeState,
    in_flight: Option<InFlight>,
}

impl<Req> Exchange<Req> {
    pub fn new(simulation: Simulation<Req>) -> Self {
        Self { simulation, state: ExchangeState::Idle, in_flight: None }
    }

    pub fn state(&self) -> &ExchangeState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn simulation(&self) -> &Simulation<Req> {
        &self.simulation
    }

    /// Move to pending and hand out the call to await.
    /// Fails with `SimError::Busy` while another call is in flight.
    pub fn start(&mut self, request: &Req) -> Result<SimulatedCall, SimError> {
        if self.in_flight.is_some() {
            return Err(SimError::Busy);
        }

        let (delay, body) = self.simulation.reply(request);
        let request_id = nanoid!();
        let cancel = CancellationToken::new();

        debug!("Starting simulated call {} ({:?})", request_id, delay);

        self.in_flight = Some(InFlight { request_id: request_id.clone(), cancel: cancel.clone() });
        self.state = ExchangeState::Pending;

        Ok(SimulatedCall { request_id, delay, body, started: Instant::now(), cancel })
    }

    /// Apply the outcome of the call started last. Completions of earlier,
    /// superseded calls are ignored and yield `None`.
    pub fn finish(&mut self, completion: Completion) -> Option<Result<Resolved, SimError>> {
        match &self.in_flight {
            Some(in_flight) if in_flight.request_id == completion.request_id => {},
            _ => {
                trace!("Ignoring stale completion {}", completion.request_id);
                return None;
            },
        }

        self.in_flight = None;
        self.state = match &completion.result {
            Ok(resolved) => ExchangeState::Resolved(resolved.clone()),
            Err(_) => ExchangeState::Idle,
        };

        Some(completion.result)
    }

    /// Cancel the call in flight, if any, and return to idle.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                debug!("Cancelling simulated call {}", in_flight.request_id);
                in_flight.cancel.cancel();
                self.state = ExchangeState::Idle;
                true
            },
            None => false,
        }
    }

    /// Start a call, wait it out and apply the result.
    pub async fn send(&mut self, request: &Req) -> Result<Resolved, SimError> {
        let call = self.start(request)?;
        let completion = call.wait().await;

        self.finish(completion).unwrap_or(Err(SimError::Cancelled))
    }
}
