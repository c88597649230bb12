use crate::command::{Command, Scenario, HELP};
use log::{debug, info, warn};
use protocol_sim::{
    protocols::{
        Delays, GraphQlPanel, GrpcCall, GrpcPanel, MqttPanel, Panel, RestPanel, RestScenario,
        SoapPanel, WebSocketPanel,
    },
    sim::{Completion, SimulatedCall},
    topic::matches,
    types::{Protocol, SimError},
};
use tokio::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug)]
pub enum PlaygroundMessage {
    Command(Command),
    Completed(Protocol, Completion),
}

/// Every protocol tab plus the one currently shown. Commands and finished
/// calls arrive on the same channel, so the state has a single owner.
pub struct Playground {
    active: Protocol,
    rest: RestPanel,
    graphql: GraphQlPanel,
    grpc: GrpcPanel,
    websocket: WebSocketPanel,
    mqtt: MqttPanel,
    soap: SoapPanel,
    sender: Sender<PlaygroundMessage>,
    receiver: Receiver<PlaygroundMessage>,
    output: Sender<String>,
}

impl Playground {
    pub fn new(delays: &Delays, initial_tab: Protocol, output: Sender<String>) -> Self {
        let (sender, receiver) = mpsc::channel(100);

        Self {
            active: initial_tab,
            rest: RestPanel::new(delays),
            graphql: GraphQlPanel::new(delays),
            grpc: GrpcPanel::new(delays),
            websocket: WebSocketPanel::new(delays),
            mqtt: MqttPanel::new(delays),
            soap: SoapPanel::new(delays),
            sender,
            receiver,
            output,
        }
    }

    pub fn sender(&self) -> Sender<PlaygroundMessage> {
        self.sender.clone()
    }

    fn panel_mut(&mut self, protocol: Protocol) -> &mut dyn Panel {
        match protocol {
            Protocol::Rest => &mut self.rest,
            Protocol::GraphQl => &mut self.graphql,
            Protocol::Grpc => &mut self.grpc,
            Protocol::WebSocket => &mut self.websocket,
            Protocol::Mqtt => &mut self.mqtt,
            Protocol::Soap => &mut self.soap,
        }
    }

    fn panel(&self, protocol: Protocol) -> &dyn Panel {
        match protocol {
            Protocol::Rest => &self.rest,
            Protocol::GraphQl => &self.graphql,
            Protocol::Grpc => &self.grpc,
            Protocol::WebSocket => &self.websocket,
            Protocol::Mqtt => &self.mqtt,
            Protocol::Soap => &self.soap,
        }
    }

    /// Print to the console. Ignore send errors, the printer only goes
    /// away once the playground itself is shutting down.
    async fn print<S: Into<String>>(&self, text: S) {
        self.output.send(text.into()).await.ok();
    }

    fn spawn_call(&self, protocol: Protocol, call: SimulatedCall) {
        let sender = self.sender.clone();

        debug!("Spawning {} call {} ({:?})", protocol, call.request_id(), call.delay());

        tokio::spawn(async move {
            let completion = call.wait().await;
            drop(sender.send(PlaygroundMessage::Completed(protocol, completion)).await);
        });
    }

    async fn start_call(&self, protocol: Protocol, result: Result<SimulatedCall, SimError>) {
        match result {
            Ok(call) => {
                let message = format!("{}: waiting {} ms", protocol, call.delay().as_millis());
                self.spawn_call(protocol, call);
                self.print(message).await;
            },
            Err(err) => self.print(format!("{}: {}", protocol, err)).await,
        }
    }

    async fn handle_scenario(&mut self, scenario: Scenario) {
        match (self.active, scenario) {
            (Protocol::Rest, Scenario::Single) => self.rest.set_scenario(RestScenario::Single),
            (Protocol::Rest, Scenario::List) => self.rest.set_scenario(RestScenario::List),
            (Protocol::Grpc, Scenario::Single) => self.grpc.set_call(GrpcCall::GetUser),
            (Protocol::Grpc, Scenario::List) => self.grpc.set_call(GrpcCall::ListUsers),
            (protocol, _) => {
                self.print(format!("{} has no scenarios", protocol)).await;
                return;
            },
        }

        self.print(self.panel(self.active).render()).await;
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Tabs => {
                let listing = Protocol::ALL
                    .iter()
                    .map(|protocol| {
                        let marker = if *protocol == self.active { '*' } else { ' ' };
                        format!(
                            "{} {} {:<9} {}",
                            marker,
                            *protocol as u8,
                            protocol.name(),
                            protocol.summary()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n");

                self.print(listing).await;
            },
            Command::Tab(protocol) => {
                info!("Switching to the {} tab", protocol);
                self.active = protocol;
                self.print(self.panel(protocol).render()).await;
            },
            Command::Show => self.print(self.panel(self.active).render()).await,
            Command::About(protocol) => {
                let protocol = protocol.unwrap_or(self.active);
                self.print(protocol.info().render()).await;
            },
            Command::Send => {
                let active = self.active;
                let result = self.panel_mut(active).send();
                self.start_call(active, result).await;
            },
            Command::Connect => {
                let result = self.websocket.connect();
                self.start_call(Protocol::WebSocket, result).await;
            },
            Command::Scenario(scenario) => self.handle_scenario(scenario).await,
            Command::Sort(sort_by_name) => {
                self.rest.set_sort_by_name(sort_by_name);
                self.print(format!("REST request: {}", self.rest.request())).await;
            },
            Command::Edit(text) => {
                let active = self.active;
                self.panel_mut(active).edit(&text);
                self.print(self.panel(active).render()).await;
            },
            Command::Subscribe(filter) => match self.mqtt.subscribe(&filter) {
                Ok(()) => self.print(format!("MQTT: subscribed to {}", filter)).await,
                Err(err) => {
                    self.print(format!("MQTT: subscribed to {} ({}, matching anyway)", filter, err))
                        .await
                },
            },
            Command::Qos(text) => {
                self.mqtt.set_qos_text(&text);

                if let Err(err) = self.mqtt.qos() {
                    self.print(format!("MQTT: {}, publishing is disabled", err)).await;
                }
            },
            Command::Match { topic, filter } => {
                let verdict = if matches(&topic, &filter) { "matches" } else { "does not match" };
                self.print(format!("{} {} {}", filter, verdict, topic)).await;
            },
            Command::Cancel => {
                let active = self.active;
                let panel = self.panel_mut(active);

                if panel.is_busy() {
                    panel.cancel();
                    self.print(format!("{}: cancelled", active)).await;
                } else {
                    self.print(format!("{}: nothing to cancel", active)).await;
                }
            },
            Command::Help => self.print(HELP).await,
            // Handled by the run loop
            Command::Quit => {},
        }
    }

    async fn handle_completion(&mut self, protocol: Protocol, completion: Completion) {
        let panel = self.panel_mut(protocol);

        // Cancelled calls still report back once their task notices
        if !panel.is_busy() {
            debug!("Dropping completion {} for idle {} tab", completion.request_id, protocol);
            return;
        }

        if let Some(next) = panel.complete(completion) {
            self.spawn_call(protocol, next);
            return;
        }

        if !self.panel(protocol).is_busy() {
            self.print(self.panel(protocol).render()).await;
        }
    }

    fn shutdown(&mut self) {
        for protocol in Protocol::ALL.iter() {
            let panel = self.panel_mut(*protocol);

            if panel.is_busy() {
                warn!("Cancelling the pending {} call on shutdown", protocol);
                panel.cancel();
            }
        }
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                PlaygroundMessage::Command(Command::Quit) => {
                    self.shutdown();
                    break;
                },
                PlaygroundMessage::Command(command) => {
                    self.handle_command(command).await;
                },
                PlaygroundMessage::Completed(protocol, completion) => {
                    self.handle_completion(protocol, completion).await;
                },
            }
        }

        info!("Playground closed");
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        command::{Command, Scenario},
        playground::{Playground, PlaygroundMessage},
    };
    use protocol_sim::{protocols::Delays, types::Protocol};
    use std::time::Duration;
    use tokio::{
        runtime::{Builder, Runtime},
        sync::mpsc,
        time,
    };

    fn paused_runtime() -> Runtime {
        Builder::new_current_thread().enable_time().start_paused(true).build().unwrap()
    }

    /// Feed `commands` to a fresh playground, sleeping where asked, and
    /// collect everything it printed.
    async fn run_session(initial_tab: Protocol, commands: Vec<(Command, u64)>) -> Vec<String> {
        let (output_tx, mut output_rx) = mpsc::channel(100);
        let playground = Playground::new(&Delays::default(), initial_tab, output_tx);
        let sender = playground.sender();
        let handle = tokio::spawn(playground.run());

        for (command, wait_ms) in commands {
            sender.send(PlaygroundMessage::Command(command)).await.unwrap();
            time::sleep(Duration::from_millis(wait_ms)).await;
        }

        sender.send(PlaygroundMessage::Command(Command::Quit)).await.unwrap();
        handle.await.unwrap();

        let mut outputs = vec![];
        while let Some(output) = output_rx.recv().await {
            outputs.push(output);
        }

        outputs
    }

    #[test]
    fn test_rest_send_and_busy() {
        let outputs = paused_runtime().block_on(run_session(
            Protocol::Rest,
            vec![(Command::Send, 0), (Command::Send, 400)],
        ));

        assert_eq!(outputs[0], "REST: waiting 300 ms");
        assert_eq!(outputs[1], "REST: a request is already in flight");
        assert!(outputs[2].contains("\"name\": \"Albus\""));
    }

    #[test]
    fn test_mqtt_delivery_through_commands() {
        let outputs = paused_runtime().block_on(run_session(
            Protocol::Rest,
            vec![
                (Command::Tab(Protocol::Mqtt), 0),
                (Command::Subscribe("/sensors/#".to_string()), 0),
                (
                    Command::Edit(
                        "Topic: /sensors/living_room/temperature\nMessage: 21.5".to_string(),
                    ),
                    0,
                ),
                (Command::Send, 2000),
            ],
        ));

        let last = outputs.last().unwrap();
        assert!(last.contains("Subscriber received: 21.5"), "{}", last);
    }

    #[test]
    fn test_mqtt_rejects_non_numeric_qos() {
        let outputs = paused_runtime().block_on(run_session(
            Protocol::Mqtt,
            vec![(Command::Qos("high".to_string()), 0), (Command::Send, 0)],
        ));

        assert_eq!(outputs[0], "MQTT: \"high\" is not a number, publishing is disabled");
        assert_eq!(outputs[1], "MQTT: \"high\" is not a number");
    }

    #[test]
    fn test_cancel_discards_response() {
        let outputs = paused_runtime().block_on(run_session(
            Protocol::Soap,
            vec![(Command::Send, 100), (Command::Cancel, 1000), (Command::Show, 0)],
        ));

        assert_eq!(outputs[1], "SOAP: cancelled");
        assert_eq!(outputs.len(), 3);
        assert!(!outputs[2].contains("GetUserResponse"));
    }

    #[test]
    fn test_websocket_connect_from_another_tab() {
        let outputs = paused_runtime().block_on(run_session(
            Protocol::Grpc,
            vec![(Command::Scenario(Scenario::List), 0), (Command::Connect, 1500)],
        ));

        assert!(outputs[0].contains("// calling UserService/ListUsers"));
        assert_eq!(outputs[1], "WebSocket: waiting 1000 ms");
        assert!(outputs[2].contains("Connected!"));
    }

    #[test]
    fn test_quit_cancels_pending_call() {
        let outputs = paused_runtime().block_on(async {
            let outputs = run_session(Protocol::Soap, vec![(Command::Send, 0)]).await;

            // Well past the 800 ms the SOAP reply would have taken
            time::sleep(Duration::from_secs(2)).await;
            outputs
        });

        assert_eq!(outputs, vec!["SOAP: waiting 800 ms"]);
    }

    #[test]
    fn test_about_defaults_to_active_tab() {
        let outputs = paused_runtime().block_on(run_session(
            Protocol::Grpc,
            vec![(Command::About(None), 0), (Command::About(Some(Protocol::Mqtt)), 0)],
        ));

        assert!(outputs[0].starts_with("gRPC (Google Remote Procedure Call)"));
        assert!(outputs[0].contains("\nCommon Use Cases:\n"));
        assert!(outputs[1].starts_with("MQTT (Message Queuing Telemetry Transport)"));
    }

    #[test]
    fn test_match_command() {
        let outputs = paused_runtime().block_on(run_session(
            Protocol::Mqtt,
            vec![
                (
                    Command::Match { topic: "a/b/c/d".to_string(), filter: "a/+/c".to_string() },
                    0,
                ),
                (Command::Match { topic: "a/x/c".to_string(), filter: "a/+/c".to_string() }, 0),
            ],
        ));

        assert_eq!(outputs, vec!["a/+/c does not match a/b/c/d", "a/+/c matches a/x/c"]);
    }
}
