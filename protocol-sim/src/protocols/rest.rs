use crate::{
    mock::{self, to_pretty_json},
    protocols::{millis, render_exchange, Delays, Panel},
    sim::{Completion, Exchange, Reply, SimulatedCall, Simulation},
    types::{Protocol, SimError},
};
use log::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RestScenario {
    Single,
    List,
}

/// What the server actually answers. The request pane is free text.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct RestQuery {
    scenario: RestScenario,
    sort_by_name: bool,
}

impl RestQuery {
    fn request_line(self) -> &'static str {
        match (self.scenario, self.sort_by_name) {
            (RestScenario::Single, _) => "GET /users/1",
            (RestScenario::List, false) => "GET /users",
            (RestScenario::List, true) => "GET /users?sort=name",
        }
    }
}

pub struct RestPanel {
    query: RestQuery,
    request: String,
    exchange: Exchange<RestQuery>,
}

impl RestPanel {
    pub fn new(delays: &Delays) -> Self {
        let list_extra = millis(delays.rest_list_extra_ms);
        let sort_extra = millis(delays.rest_sort_extra_ms);

        let simulation = Simulation::new(millis(delays.rest_base_ms), move |query: &RestQuery| {
            match query.scenario {
                RestScenario::Single => Reply::new(to_pretty_json(&mock::users()[0])),
                RestScenario::List if query.sort_by_name => {
                    Reply::new(to_pretty_json(&mock::users_sorted_by_name()))
                        .with_extra_delay(list_extra + sort_extra)
                },
                RestScenario::List => {
                    Reply::new(to_pretty_json(&mock::users())).with_extra_delay(list_extra)
                },
            }
        });

        let query = RestQuery { scenario: RestScenario::Single, sort_by_name: false };

        Self { query, request: query.request_line().to_string(), exchange: Exchange::new(simulation) }
    }

    pub fn scenario(&self) -> RestScenario {
        self.query.scenario
    }

    /// Switching scenario regenerates the request line.
    pub fn set_scenario(&mut self, scenario: RestScenario) {
        self.query.scenario = scenario;
        self.request = self.query.request_line().to_string();
    }

    /// Only affects the list scenario.
    pub fn set_sort_by_name(&mut self, sort_by_name: bool) {
        self.query.sort_by_name = sort_by_name;
        self.request = self.query.request_line().to_string();
    }

    pub fn request(&self) -> &str {
        &self.request
    }
}

impl Panel for RestPanel {
    fn protocol(&self) -> Protocol {
        Protocol::Rest
    }

    fn send(&mut self) -> Result<SimulatedCall, SimError> {
        debug!("REST request: {}", self.request);
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
        self.request = text.to_string();
    }

    fn is_busy(&self) -> bool {
        self.exchange.is_pending()
    }

    fn render(&self) -> String {
        render_exchange(Protocol::Rest, &self.request, self.exchange.state())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        mock::{self, to_pretty_json},
        protocols::{Delays, Panel, RestPanel, RestScenario},
        types::ExchangeState,
    };
    use std::time::Duration;
    use tokio::runtime::Builder;

    #[test]
    fn test_request_line_follows_scenario() {
        let mut panel = RestPanel::new(&Delays::default());
        assert_eq!(panel.request(), "GET /users/1");

        panel.set_scenario(RestScenario::List);
        assert_eq!(panel.request(), "GET /users");

        panel.set_sort_by_name(true);
        assert_eq!(panel.request(), "GET /users?sort=name");

        panel.set_scenario(RestScenario::Single);
        assert_eq!(panel.request(), "GET /users/1");
    }

    #[test]
    fn test_latency_rule() {
        let mut panel = RestPanel::new(&Delays::default());

        let call = panel.send().unwrap();
        assert_eq!(call.delay(), Duration::from_millis(300));
        panel.cancel();

        panel.set_scenario(RestScenario::List);
        let call = panel.send().unwrap();
        assert_eq!(call.delay(), Duration::from_millis(450));
        panel.cancel();

        panel.set_sort_by_name(true);
        let call = panel.send().unwrap();
        assert_eq!(call.delay(), Duration::from_millis(600));
    }

    #[test]
    fn test_sorted_list_response() {
        let runtime = Builder::new_current_thread().enable_time().start_paused(true).build().unwrap();

        runtime.block_on(async {
            let mut panel = RestPanel::new(&Delays::default());
            panel.set_scenario(RestScenario::List);
            panel.set_sort_by_name(true);

            let call = panel.send().unwrap();
            assert!(panel.is_busy());
            assert!(panel.complete(call.wait().await).is_none());

            match panel.exchange.state() {
                ExchangeState::Resolved(resolved) => {
                    assert_eq!(resolved.response, to_pretty_json(&mock::users_sorted_by_name()));
                    assert!(resolved.elapsed >= Duration::from_millis(600));
                },
                state => panic!("unexpected state {:?}", state),
            }
        });
    }

    #[test]
    fn test_edited_request_is_echoed() {
        let mut panel = RestPanel::new(&Delays::default());
        panel.edit("DELETE /users/2");

        assert!(panel.render().contains("DELETE /users/2"));
    }
}
