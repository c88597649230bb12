use num_enum::TryFromPrimitive;
use std::{convert::TryFrom, fmt, str::FromStr, time::Duration};

/// The protocols the playground compares, in tab order.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum Protocol {
    Rest = 0,
    GraphQl = 1,
    Grpc = 2,
    WebSocket = 3,
    Mqtt = 4,
    Soap = 5,
}

impl Protocol {
    pub const ALL: [Protocol; 6] = [
        Protocol::Rest,
        Protocol::GraphQl,
        Protocol::Grpc,
        Protocol::WebSocket,
        Protocol::Mqtt,
        Protocol::Soap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Protocol::Rest => "REST",
            Protocol::GraphQl => "GraphQL",
            Protocol::Grpc => "gRPC",
            Protocol::WebSocket => "WebSocket",
            Protocol::Mqtt => "MQTT",
            Protocol::Soap => "SOAP",
        }
    }

    /// One line on what sets the protocol apart.
    pub fn summary(self) -> &'static str {
        match self {
            Protocol::Rest => {
                "Resource-oriented HTTP using standard verbs; stateless and the most widely adopted style for public APIs."
            },
            Protocol::GraphQl => {
                "A query language over a single endpoint; clients ask for exactly the fields they need."
            },
            Protocol::Grpc => {
                "RPC framework on HTTP/2 with Protocol Buffers contracts; built for low latency between services."
            },
            Protocol::WebSocket => {
                "A persistent, full-duplex connection for real-time traffic in both directions."
            },
            Protocol::Mqtt => {
                "Lightweight publish/subscribe through a broker, aimed at constrained devices and unreliable networks."
            },
            Protocol::Soap => {
                "XML envelopes with strict contracts, mostly found in enterprise and legacy systems."
            },
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProtocolError(pub String);

impl fmt::Display for ParseProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown protocol \"{}\"", self.0)
    }
}

impl std::error::Error for ParseProtocolError {}

impl FromStr for Protocol {
    type Err = ParseProtocolError;

    /// Accepts a tab index or a case-insensitive protocol name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(index) = s.parse::<u8>() {
            return Protocol::try_from(index).map_err(|_| ParseProtocolError(s.to_string()));
        }

        Protocol::ALL
            .iter()
            .copied()
            .find(|protocol| protocol.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseProtocolError(s.to_string()))
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive)]
pub enum QoS {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

impl Default for QoS {
    fn default() -> Self {
        QoS::AtMostOnce
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A call is already in flight on this panel.
    Busy,
    Cancelled,
    NotConnected,
    NonNumeric(String),
    InvalidQoS(u32),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Busy => f.write_str("a request is already in flight"),
            SimError::Cancelled => f.write_str("the request was cancelled"),
            SimError::NotConnected => f.write_str("not connected"),
            SimError::NonNumeric(text) => write!(f, "\"{}\" is not a number", text),
            SimError::InvalidQoS(qos) => write!(f, "{} is not a valid QoS (expected 0, 1 or 2)", qos),
        }
    }
}

impl std::error::Error for SimError {}

/// A canned response plus how long it took to arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub response: String,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Pending,
    Resolved(Resolved),
}

impl Default for ExchangeState {
    fn default() -> Self {
        ExchangeState::Idle
    }
}

impl ExchangeState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ExchangeState::Pending)
    }
}
