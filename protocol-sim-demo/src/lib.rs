mod command;
mod config;
mod playground;

pub use command::{Command, CommandError, Scenario, HELP};
pub use config::{ConfigError, PlaygroundConfig};
pub use playground::{Playground, PlaygroundMessage};
