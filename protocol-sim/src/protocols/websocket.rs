use crate::{
    protocols::{millis, Delays, Panel},
    sim::{Completion, Exchange, Reply, SimulatedCall, Simulation},
    types::{Protocol, SimError},
};
use log::{debug, info};

const SERVER_REPLY: &str = "Hi there!";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WebSocketPhase {
    Disconnected,
    Connecting,
    Connected,
    Sending,
    Receiving,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Step {
    Connect,
    Send,
    Receive,
}

/// A chat over one persistent connection. The handshake happens once,
/// afterwards every message is a send followed by the server's reply.
pub struct WebSocketPanel {
    message: String,
    log: String,
    phase: WebSocketPhase,
    exchange: Exchange<Step>,
}

impl WebSocketPanel {
    pub fn new(delays: &Delays) -> Self {
        let connect = millis(delays.websocket_connect_ms);
        let send = millis(delays.websocket_send_ms);
        let receive = millis(delays.websocket_receive_ms);

        let simulation = Simulation::new(millis(0), move |step: &Step| match step {
            Step::Connect => Reply::new("Connected!").with_extra_delay(connect),
            Step::Send => Reply::new("").with_extra_delay(send),
            Step::Receive => Reply::new(SERVER_REPLY).with_extra_delay(receive),
        });

        Self {
            message: "Hello".to_string(),
            log: String::new(),
            phase: WebSocketPhase::Disconnected,
            exchange: Exchange::new(simulation),
        }
    }

    pub fn phase(&self) -> WebSocketPhase {
        self.phase
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn connect(&mut self) -> Result<SimulatedCall, SimError> {
        if self.phase != WebSocketPhase::Disconnected {
            return Err(SimError::Busy);
        }

        let call = self.exchange.start(&Step::Connect)?;
        self.log = "Connecting...\n".to_string();
        self.phase = WebSocketPhase::Connecting;

        Ok(call)
    }

    pub fn send_message(&mut self) -> Result<SimulatedCall, SimError> {
        match self.phase {
            WebSocketPhase::Disconnected | WebSocketPhase::Connecting => {
                return Err(SimError::NotConnected)
            },
            WebSocketPhase::Sending | WebSocketPhase::Receiving => return Err(SimError::Busy),
            WebSocketPhase::Connected => {},
        }

        let call = self.exchange.start(&Step::Send)?;
        self.log.push_str(&format!("Sent: {}\n", self.message));
        self.phase = WebSocketPhase::Sending;

        Ok(call)
    }
}

impl Panel for WebSocketPanel {
    fn protocol(&self) -> Protocol {
        Protocol::WebSocket
    }

    /// Connect first, then send.
    fn send(&mut self) -> Result<SimulatedCall, SimError> {
        if self.phase == WebSocketPhase::Disconnected {
            self.connect()
        } else {
            self.send_message()
        }
    }

    fn complete(&mut self, completion: Completion) -> Option<SimulatedCall> {
        let resolved = match self.exchange.finish(completion)? {
            Ok(resolved) => resolved,
            Err(_) => {
                self.cancel();
                return None;
            },
        };

        match self.phase {
            WebSocketPhase::Connecting => {
                info!("WebSocket connected");
                self.log.push_str(&format!("{}\n", resolved.response));
                self.phase = WebSocketPhase::Connected;
                None
            },
            WebSocketPhase::Sending => match self.exchange.start(&Step::Receive) {
                Ok(call) => {
                    self.phase = WebSocketPhase::Receiving;
                    Some(call)
                },
                Err(err) => {
                    debug!("Could not start receive: {}", err);
                    self.phase = WebSocketPhase::Connected;
                    None
                },
            },
            WebSocketPhase::Receiving => {
                self.log.push_str(&format!("Received: {}\n", resolved.response));
                self.phase = WebSocketPhase::Connected;
                None
            },
            WebSocketPhase::Disconnected | WebSocketPhase::Connected => None,
        }
    }

    fn cancel(&mut self) {
        self.exchange.cancel();

        self.phase = match self.phase {
            WebSocketPhase::Connecting => WebSocketPhase::Disconnected,
            WebSocketPhase::Sending | WebSocketPhase::Receiving => WebSocketPhase::Connected,
            phase => phase,
        };
    }

    fn edit(&mut self, text: &str) {
        self.message = text.to_string();
    }

    fn is_busy(&self) -> bool {
        self.exchange.is_pending()
    }

    fn render(&self) -> String {
        format!(
            "== {} ({:?}) ==\n--- message ---\n{}\n--- log ---\n{}",
            Protocol::WebSocket,
            self.phase,
            self.message,
            self.log
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        protocols::{Delays, Panel, WebSocketPanel, WebSocketPhase},
        types::SimError,
    };
    use std::time::Duration;
    use tokio::runtime::Builder;

    #[test]
    fn test_chat_sequence() {
        let runtime = Builder::new_current_thread().enable_time().start_paused(true).build().unwrap();

        runtime.block_on(async {
            let mut panel = WebSocketPanel::new(&Delays::default());

            let connect = panel.send().unwrap();
            assert_eq!(connect.delay(), Duration::from_millis(1000));
            assert_eq!(panel.phase(), WebSocketPhase::Connecting);
            assert!(panel.complete(connect.wait().await).is_none());
            assert_eq!(panel.phase(), WebSocketPhase::Connected);

            let send = panel.send().unwrap();
            assert_eq!(panel.phase(), WebSocketPhase::Sending);
            let receive = panel.complete(send.wait().await).unwrap();
            assert_eq!(panel.phase(), WebSocketPhase::Receiving);
            assert_eq!(receive.delay(), Duration::from_millis(500));
            assert!(panel.complete(receive.wait().await).is_none());

            assert_eq!(panel.phase(), WebSocketPhase::Connected);
            assert_eq!(panel.log(), "Connecting...\nConnected!\nSent: Hello\nReceived: Hi there!\n");
        });
    }

    #[test]
    fn test_send_before_connected() {
        let mut panel = WebSocketPanel::new(&Delays::default());
        assert_eq!(panel.send_message().unwrap_err(), SimError::NotConnected);

        let _connect = panel.connect().unwrap();
        assert_eq!(panel.send_message().unwrap_err(), SimError::NotConnected);
        assert_eq!(panel.connect().unwrap_err(), SimError::Busy);
    }

    #[test]
    fn test_cancel_connect() {
        let mut panel = WebSocketPanel::new(&Delays::default());
        let _connect = panel.send().unwrap();

        panel.cancel();
        assert_eq!(panel.phase(), WebSocketPhase::Disconnected);
        assert!(!panel.is_busy());
    }
}
