use crate::{
    mock::{self, to_pretty_json},
    protocols::{millis, render_exchange, Delays, Panel},
    sim::{Completion, Exchange, Reply, SimulatedCall, Simulation},
    types::{Protocol, SimError},
};
use log::debug;
use serde_json::json;

pub const USER_SERVICE_PROTO: &str = r#"syntax = "proto3";

service UserService {
  rpc GetUser (GetUserRequest) returns (User);
  rpc ListUsers (ListUsersRequest) returns (UserList);
}

message GetUserRequest {
  string id = 1;
}

message ListUsersRequest {
  // Could be empty or include pagination fields
}

message User {
  string id = 1;
  string name = 2;
  string email = 3;
}

message UserList {
  repeated User users = 1;
}
"#;

/// The `UserService` method to invoke.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GrpcCall {
    GetUser,
    ListUsers,
}

impl GrpcCall {
    pub fn method(self) -> &'static str {
        match self {
            GrpcCall::GetUser => "UserService/GetUser",
            GrpcCall::ListUsers => "UserService/ListUsers",
        }
    }
}

pub struct GrpcPanel {
    proto: String,
    call: GrpcCall,
    exchange: Exchange<GrpcCall>,
}

impl GrpcPanel {
    pub fn new(delays: &Delays) -> Self {
        let simulation = Simulation::new(millis(delays.grpc_ms), |call: &GrpcCall| match call {
            GrpcCall::GetUser => Reply::new(to_pretty_json(&mock::users()[0])),
            GrpcCall::ListUsers => Reply::new(to_pretty_json(&json!({ "users": mock::users() }))),
        });

        Self {
            proto: USER_SERVICE_PROTO.to_string(),
            call: GrpcCall::GetUser,
            exchange: Exchange::new(simulation),
        }
    }

    pub fn set_call(&mut self, call: GrpcCall) {
        self.call = call;
    }
}

impl Panel for GrpcPanel {
    fn protocol(&self) -> Protocol {
        Protocol::Grpc
    }

    fn send(&mut self) -> Result<SimulatedCall, SimError> {
        debug!("gRPC call {}", self.call.method());
        self.exchange.start(&self.call)
    }

    fn complete(&mut self, completion: Completion) -> Option<SimulatedCall> {
        self.exchange.finish(completion);
        None
    }

    fn cancel(&mut self) {
        self.exchange.cancel();
    }

    fn edit(&mut self, text: &str) {
        self.proto = text.to_string();
    }

    fn is_busy(&self) -> bool {
        self.exchange.is_pending()
    }

    fn render(&self) -> String {
        let request = format!("{}\n// calling {}", self.proto.trim_end(), self.call.method());
        render_exchange(Protocol::Grpc, &request, self.exchange.state())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        protocols::{Delays, GrpcCall, GrpcPanel, Panel},
        types::ExchangeState,
    };
    use std::time::Duration;
    use tokio::runtime::Builder;

    #[test]
    fn test_list_users_wraps_in_message() {
        let runtime = Builder::new_current_thread().enable_time().start_paused(true).build().unwrap();

        runtime.block_on(async {
            let mut panel = GrpcPanel::new(&Delays::default());
            panel.set_call(GrpcCall::ListUsers);

            let call = panel.send().unwrap();
            assert_eq!(call.delay(), Duration::from_millis(100));
            panel.complete(call.wait().await);

            match panel.exchange.state() {
                ExchangeState::Resolved(resolved) => {
                    let body: serde_json::Value = serde_json::from_str(&resolved.response).unwrap();
                    assert_eq!(body["users"].as_array().map(|users| users.len()), Some(3));
                },
                state => panic!("unexpected state {:?}", state),
            }
        });
    }

    #[test]
    fn test_render_names_method() {
        let mut panel = GrpcPanel::new(&Delays::default());
        assert!(panel.render().contains("// calling UserService/GetUser"));

        panel.set_call(GrpcCall::ListUsers);
        assert!(panel.render().contains("// calling UserService/ListUsers"));
    }
}
