use crate::{
    protocols::{millis, Delays, Panel},
    sim::{Completion, Exchange, Reply, SimulatedCall, Simulation},
    topic::{Topic, TopicFilter, TopicParseError},
    types::{Protocol, QoS, SimError},
};
use bytes::Bytes;
use log::{debug, info, warn};
use std::convert::TryFrom;

const TOPIC_PREFIX: &str = "Topic: ";
const MESSAGE_PREFIX: &str = "Message: ";

/// The publisher pane, which shows as
///
/// ```text
/// Topic: /chat/global
/// Message: Hi!
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishForm {
    pub topic: String,
    pub message: String,
}

impl PublishForm {
    /// Parse the edited pane. Missing lines leave empty fields.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.split('\n');
        let topic_line = lines.next().unwrap_or("");
        let message_line = lines.next().unwrap_or("");

        Self {
            topic: topic_line.replacen(TOPIC_PREFIX, "", 1),
            message: message_line.replacen(MESSAGE_PREFIX, "", 1),
        }
    }

    pub fn render(&self) -> String {
        format!("{}{}\n{}{}", TOPIC_PREFIX, self.topic, MESSAGE_PREFIX, self.message)
    }
}

impl Default for PublishForm {
    fn default() -> Self {
        Self { topic: "/chat/global".to_string(), message: "Hi!".to_string() }
    }
}

#[derive(Debug, Clone)]
struct Publish {
    topic: Topic,
    qos: QoS,
    payload: Bytes,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Publishing,
    Delivering,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Step {
    Publish,
    Deliver,
}

/// One publisher, one subscriber and a broker in between. A published
/// message only reaches the subscriber when its filter matches the topic.
pub struct MqttPanel {
    form: PublishForm,
    qos_text: String,
    filter: TopicFilter,
    log: String,
    phase: Phase,
    in_flight: Option<Publish>,
    exchange: Exchange<Step>,
}

impl MqttPanel {
    pub fn new(delays: &Delays) -> Self {
        let publish = millis(delays.mqtt_publish_ms);
        let deliver = millis(delays.mqtt_deliver_ms);

        let simulation = Simulation::new(millis(0), move |step: &Step| match step {
            Step::Publish => Reply::new("Message published!").with_extra_delay(publish),
            Step::Deliver => Reply::new("").with_extra_delay(deliver),
        });

        Self {
            form: PublishForm::default(),
            qos_text: "0".to_string(),
            filter: TopicFilter::new("#"),
            log: String::new(),
            phase: Phase::Idle,
            in_flight: None,
            exchange: Exchange::new(simulation),
        }
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    /// Replace the subscription filter. The filter is kept even when it
    /// breaks MQTT rules; matching is best effort either way.
    pub fn subscribe(&mut self, filter: &str) -> Result<(), TopicParseError> {
        self.filter = TopicFilter::new(filter);

        let validation = self.filter.validate();
        match &validation {
            Ok(()) => info!("Subscribed to \"{}\"", self.filter),
            Err(err) => warn!("Subscribed to non-conforming filter \"{}\": {}", self.filter, err),
        }

        validation
    }

    pub fn set_qos_text(&mut self, text: &str) {
        self.qos_text = text.to_string();
    }

    /// The QoS field only accepts 0, 1 or 2.
    pub fn qos(&self) -> Result<QoS, SimError> {
        let text = self.qos_text.trim();
        let value: u32 = text.parse().map_err(|_| SimError::NonNumeric(text.to_string()))?;

        u8::try_from(value)
            .ok()
            .and_then(|qos| QoS::try_from(qos).ok())
            .ok_or(SimError::InvalidQoS(value))
    }

    /// Whether a message on `topic` would reach the subscriber.
    pub fn would_deliver(&self, topic: &str) -> bool {
        self.filter.matches(&Topic::new(topic))
    }

    fn start_delivery(&mut self) -> Option<SimulatedCall> {
        let topic = match &self.in_flight {
            Some(publish) => publish.topic.clone(),
            None => return None,
        };

        if !self.filter.matches(&topic) {
            debug!("No subscription matches {}", topic);
            self.log.push_str(&format!("No subscriber matched {}\n", topic));
            self.in_flight = None;
            self.phase = Phase::Idle;
            return None;
        }

        match self.exchange.start(&Step::Deliver) {
            Ok(call) => {
                self.phase = Phase::Delivering;
                Some(call)
            },
            Err(err) => {
                warn!("Could not start delivery: {}", err);
                self.phase = Phase::Idle;
                None
            },
        }
    }
}

impl Panel for MqttPanel {
    fn protocol(&self) -> Protocol {
        Protocol::Mqtt
    }

    fn send(&mut self) -> Result<SimulatedCall, SimError> {
        if self.phase != Phase::Idle {
            return Err(SimError::Busy);
        }

        let qos = self.qos()?;
        let call = self.exchange.start(&Step::Publish)?;

        debug!("Publishing to {} with {:?}", self.form.topic, qos);

        self.log = format!("Publishing to {}: {}\n", self.form.topic, self.form.message);
        self.in_flight = Some(Publish {
            topic: Topic::new(&self.form.topic),
            qos,
            payload: Bytes::from(self.form.message.clone()),
        });
        self.phase = Phase::Publishing;

        Ok(call)
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
            Phase::Publishing => {
                self.log.push_str(&format!("{}\n", resolved.response));
                self.start_delivery()
            },
            Phase::Delivering => {
                if let Some(publish) = self.in_flight.take() {
                    debug!("Delivered {:?} message on {}", publish.qos, publish.topic);
                    self.log.push_str(&format!(
                        "Subscriber received: {}\n",
                        String::from_utf8_lossy(&publish.payload)
                    ));
                }

                self.phase = Phase::Idle;
                None
            },
            Phase::Idle => None,
        }
    }

    fn cancel(&mut self) {
        self.exchange.cancel();
        self.in_flight = None;
        self.phase = Phase::Idle;
    }

    fn edit(&mut self, text: &str) {
        self.form = PublishForm::parse(text);
    }

    fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    fn render(&self) -> String {
        format!(
            "== {} ==\n--- publisher (QoS {}) ---\n{}\n--- subscriber ---\n{}\n--- log ---\n{}",
            Protocol::Mqtt,
            self.qos_text,
            self.form.render(),
            self.filter,
            self.log
        )
    }
}
