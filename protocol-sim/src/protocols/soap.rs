use crate::{
    protocols::{millis, render_exchange, Delays, Panel},
    sim::{Completion, Exchange, Reply, SimulatedCall, Simulation},
    types::{Protocol, SimError},
};
use log::debug;

pub const DEFAULT_ENVELOPE: &str = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"
  xmlns:user="http://example.com/user">
  <soapenv:Header/>
  <soapenv:Body>
    <user:GetUserRequest>
      <user:id>1</user:id>
    </user:GetUserRequest>
  </soapenv:Body>
</soapenv:Envelope>"#;

const RESPONSE_ENVELOPE: &str = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Body>
    <user:GetUserResponse xmlns:user="http://example.com/user">
      <user:name>Albus</user:name>
    </user:GetUserResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

pub struct SoapPanel {
    envelope: String,
    exchange: Exchange<String>,
}

impl SoapPanel {
    pub fn new(delays: &Delays) -> Self {
        let simulation =
            Simulation::new(millis(delays.soap_ms), |_envelope: &String| Reply::new(RESPONSE_ENVELOPE));

        Self { envelope: DEFAULT_ENVELOPE.to_string(), exchange: Exchange::new(simulation) }
    }
}

impl Panel for SoapPanel {
    fn protocol(&self) -> Protocol {
        Protocol::Soap
    }

    fn send(&mut self) -> Result<SimulatedCall, SimError> {
        debug!("SOAP envelope of {} bytes", self.envelope.len());
        self.exchange.start(&self.envelope)
    }

    fn complete(&mut self, completion: Completion) -> Option<SimulatedCall> {
        self.exchange.finish(completion);
        None
    }

    fn cancel(&mut self) {
        self.exchange.cancel();
    }

    fn edit(&mut self, text: &str) {
        self.envelope = text.to_string();
    }

    fn is_busy(&self) -> bool {
        self.exchange.is_pending()
    }

    fn render(&self) -> String {
        render_exchange(Protocol::Soap, &self.envelope, self.exchange.state())
    }
}

#[cfg(test)]
mod tests {
    use crate::protocols::{Delays, Panel, SoapPanel};
    use std::time::Duration;
    use tokio::runtime::Builder;

    #[test]
    fn test_envelope_round_trip() {
        let runtime = Builder::new_current_thread().enable_time().start_paused(true).build().unwrap();

        runtime.block_on(async {
            let mut panel = SoapPanel::new(&Delays::default());
            let call = panel.send().unwrap();
            assert_eq!(call.delay(), Duration::from_millis(800));

            panel.complete(call.wait().await);

            let rendered = panel.render();
            assert!(rendered.contains("<user:GetUserRequest>"));
            assert!(rendered.contains("<user:name>Albus</user:name>"));
            assert!(!panel.is_busy());
        });
    }
}
