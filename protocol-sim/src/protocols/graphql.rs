use crate::{
    mock::to_pretty_json,
    protocols::{millis, render_exchange, Delays, Panel},
    sim::{Completion, Exchange, Reply, SimulatedCall, Simulation},
    types::{Protocol, SimError},
};
use log::debug;
use serde_json::json;

pub const DEFAULT_QUERY: &str = "{
  user(id: 1) {
    name
    email
  }
}";

pub struct GraphQlPanel {
    query: String,
    exchange: Exchange<String>,
}

impl GraphQlPanel {
    pub fn new(delays: &Delays) -> Self {
        // Whatever the query asks for, the server answers with the same selection.
        let simulation = Simulation::new(millis(delays.graphql_ms), |_query: &String| {
            Reply::new(to_pretty_json(&json!({
                "data": {
                    "user": {
                        "name": "Albus",
                        "email": "a@b.com"
                    }
                }
            })))
        });

        Self { query: DEFAULT_QUERY.to_string(), exchange: Exchange::new(simulation) }
    }
}

impl Panel for GraphQlPanel {
    fn protocol(&self) -> Protocol {
        Protocol::GraphQl
    }

    fn send(&mut self) -> Result<SimulatedCall, SimError> {
        debug!("GraphQL query of {} bytes", self.query.len());
        self.exchange.start(&self.query)
    }

    fn complete(&mut self, completion: Completion) -> Option<SimulatedCall> {
        self.exchange.finish(completion);
        None
    }

    fn cancel(&mut self) {
        self.exchange.cancel();
    }

    fn edit(&mut self, text: &str) {
        self.query = text.to_string();
    }

    fn is_busy(&self) -> bool {
        self.exchange.is_pending()
    }

    fn render(&self) -> String {
        render_exchange(Protocol::GraphQl, &self.query, self.exchange.state())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        protocols::{Delays, GraphQlPanel, Panel},
        types::ExchangeState,
    };
    use std::time::Duration;
    use tokio::runtime::Builder;

    #[test]
    fn test_query_resolves_to_selected_user() {
        let runtime = Builder::new_current_thread().enable_time().start_paused(true).build().unwrap();

        runtime.block_on(async {
            let mut panel = GraphQlPanel::new(&Delays::default());
            let call = panel.send().unwrap();
            assert_eq!(call.delay(), Duration::from_millis(200));

            panel.complete(call.wait().await);

            match panel.exchange.state() {
                ExchangeState::Resolved(resolved) => {
                    let body: serde_json::Value = serde_json::from_str(&resolved.response).unwrap();
                    assert_eq!(body["data"]["user"]["name"], "Albus");
                    assert_eq!(body["data"]["user"]["email"], "a@b.com");
                },
                state => panic!("unexpected state {:?}", state),
            }
        });
    }

    #[test]
    fn test_second_send_while_pending_is_rejected() {
        let mut panel = GraphQlPanel::new(&Delays::default());
        let _call = panel.send().unwrap();

        assert!(panel.is_busy());
        assert!(panel.send().is_err());
        assert!(panel.render().contains("(waiting...)"));
    }
}
