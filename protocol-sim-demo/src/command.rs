use protocol_sim::types::{ParseProtocolError, Protocol};
use std::{fmt, str::FromStr};

pub const HELP: &str = "\
commands:
  tabs                     list the protocol tabs
  tab <index|name>         switch to a tab
  show                     print the current tab
  about [index|name]       pros, cons and use cases of a protocol
  send                     press the tab's main button
  connect                  open the WebSocket connection
  scenario single|list     REST user / user list, gRPC GetUser / ListUsers
  sort on|off              REST: add ?sort=name to the list request
  edit <text>              replace the request pane (use \\n for new lines)
  subscribe <filter>       MQTT: set the subscriber's topic filter
  qos <value>              MQTT: set the QoS field
  match <topic> <filter>   check a topic against a filter
  cancel                   abandon the request in flight
  help                     show this text
  quit                     leave the playground";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Scenario {
    Single,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tabs,
    Tab(Protocol),
    Show,
    About(Option<Protocol>),
    Send,
    Connect,
    Scenario(Scenario),
    Sort(bool),
    Edit(String),
    Subscribe(String),
    Qos(String),
    Match { topic: String, filter: String },
    Cancel,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    InvalidArgument(String),
    Protocol(ParseProtocolError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => f.write_str("empty command"),
            CommandError::Unknown(word) => write!(f, "unknown command \"{}\", try \"help\"", word),
            CommandError::MissingArgument(what) => write!(f, "missing {}", what),
            CommandError::InvalidArgument(arg) => write!(f, "invalid argument \"{}\"", arg),
            CommandError::Protocol(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<ParseProtocolError> for CommandError {
    fn from(err: ParseProtocolError) -> Self {
        CommandError::Protocol(err)
    }
}

fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn required<'a>(arg: &'a str, what: &'static str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument(what))
    } else {
        Ok(arg)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], line[pos..].trim_start()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Err(CommandError::Empty),
            "tabs" => Command::Tabs,
            "tab" => Command::Tab(required(rest, "tab")?.parse()?),
            "show" => Command::Show,
            "about" if rest.is_empty() => Command::About(None),
            "about" => Command::About(Some(rest.parse()?)),
            "send" | "publish" => Command::Send,
            "connect" => Command::Connect,
            "scenario" => match required(rest, "scenario")?.to_ascii_lowercase().as_str() {
                "single" | "getuser" => Command::Scenario(Scenario::Single),
                "list" | "listusers" => Command::Scenario(Scenario::List),
                other => return Err(CommandError::InvalidArgument(other.to_string())),
            },
            "sort" => match required(rest, "on or off")? {
                "on" => Command::Sort(true),
                "off" => Command::Sort(false),
                other => return Err(CommandError::InvalidArgument(other.to_string())),
            },
            "edit" => Command::Edit(unescape_newlines(rest)),
            "subscribe" => Command::Subscribe(required(rest, "topic filter")?.to_string()),
            // Validated when publishing, like the QoS field itself
            "qos" => Command::Qos(rest.to_string()),
            "match" => {
                let mut args = rest.split_whitespace();
                let topic = args.next().ok_or(CommandError::MissingArgument("topic"))?;
                let filter = args.next().ok_or(CommandError::MissingArgument("topic filter"))?;

                Command::Match { topic: topic.to_string(), filter: filter.to_string() }
            },
            "cancel" => Command::Cancel,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use crate::command::{Command, CommandError, Scenario};
    use protocol_sim::types::Protocol;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("send".parse::<Command>().unwrap(), Command::Send);
        assert_eq!("  QUIT ".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("tab mqtt".parse::<Command>().unwrap(), Command::Tab(Protocol::Mqtt));
        assert_eq!("tab 2".parse::<Command>().unwrap(), Command::Tab(Protocol::Grpc));
        assert_eq!("scenario ListUsers".parse::<Command>().unwrap(), Command::Scenario(Scenario::List));
        assert_eq!("sort on".parse::<Command>().unwrap(), Command::Sort(true));
        assert_eq!("about".parse::<Command>().unwrap(), Command::About(None));
        assert_eq!("about soap".parse::<Command>().unwrap(), Command::About(Some(Protocol::Soap)));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            "edit Topic: /sensors/a\\nMessage: 21.5".parse::<Command>().unwrap(),
            Command::Edit("Topic: /sensors/a\nMessage: 21.5".to_string())
        );
        assert_eq!(
            "match /sensors/a /sensors/#".parse::<Command>().unwrap(),
            Command::Match { topic: "/sensors/a".to_string(), filter: "/sensors/#".to_string() }
        );
        assert_eq!("qos abc".parse::<Command>().unwrap(), Command::Qos("abc".to_string()));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>().unwrap_err(), CommandError::Empty);
        assert_eq!("fly".parse::<Command>().unwrap_err(), CommandError::Unknown("fly".to_string()));
        assert_eq!("tab".parse::<Command>().unwrap_err(), CommandError::MissingArgument("tab"));
        assert_eq!(
            "match onlytopic".parse::<Command>().unwrap_err(),
            CommandError::MissingArgument("topic filter")
        );
        assert_eq!(
            "sort maybe".parse::<Command>().unwrap_err(),
            CommandError::InvalidArgument("maybe".to_string())
        );
        assert!(matches!("tab ftp".parse::<Command>().unwrap_err(), CommandError::Protocol(_)));
    }
}
