//! One panel per protocol. Each panel holds the editable request text, an
//! [`Exchange`](crate::sim::Exchange) and whatever per-protocol state the
//! screen needs.

use crate::{
    sim::{Completion, SimulatedCall},
    types::{ExchangeState, Protocol, SimError},
};
use serde::Deserialize;
use std::time::Duration;

mod graphql;
mod grpc;
mod mqtt;
mod rest;
mod soap;
mod websocket;

pub use graphql::GraphQlPanel;
pub use grpc::{GrpcCall, GrpcPanel};
pub use mqtt::{MqttPanel, PublishForm};
pub use rest::{RestPanel, RestScenario};
pub use soap::SoapPanel;
pub use websocket::{WebSocketPanel, WebSocketPhase};

/// Simulated latencies, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Delays {
    pub rest_base_ms: u64,
    pub rest_list_extra_ms: u64,
    pub rest_sort_extra_ms: u64,
    pub graphql_ms: u64,
    pub grpc_ms: u64,
    pub soap_ms: u64,
    pub websocket_connect_ms: u64,
    pub websocket_send_ms: u64,
    pub websocket_receive_ms: u64,
    pub mqtt_publish_ms: u64,
    pub mqtt_deliver_ms: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            rest_base_ms: 300,
            rest_list_extra_ms: 150,
            rest_sort_extra_ms: 150,
            graphql_ms: 200,
            grpc_ms: 100,
            soap_ms: 800,
            websocket_connect_ms: 1000,
            websocket_send_ms: 500,
            websocket_receive_ms: 500,
            mqtt_publish_ms: 1000,
            mqtt_deliver_ms: 500,
        }
    }
}

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// The controls every protocol screen shares.
pub trait Panel: Send + Sync {
    fn protocol(&self) -> Protocol;

    /// The screen's primary button. Returns the call to run, or an error
    /// when the button would be disabled.
    fn send(&mut self) -> Result<SimulatedCall, SimError>;

    /// Apply a finished call. Multi-step exchanges return the next call.
    fn complete(&mut self, completion: Completion) -> Option<SimulatedCall>;

    /// Drop whatever is in flight.
    fn cancel(&mut self);

    /// Replace the contents of the editable request pane.
    fn edit(&mut self, text: &str);

    fn is_busy(&self) -> bool;

    fn render(&self) -> String;
}

/// Request pane, response pane and timer, as the request/response screens
/// lay them out.
fn render_exchange(protocol: Protocol, request: &str, state: &ExchangeState) -> String {
    let mut out = format!("== {} ==\n--- request ---\n{}\n--- response ---\n", protocol, request);

    match state {
        ExchangeState::Idle => {},
        ExchangeState::Pending => out.push_str("(waiting...)\n"),
        ExchangeState::Resolved(resolved) => {
            out.push_str(&resolved.response);
            out.push('\n');
            out.push_str(&format!(
                "--- {:.2} ms ---\n",
                resolved.elapsed.as_secs_f64() * 1000.0
            ));
        },
    }

    out
}
