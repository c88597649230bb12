use protocol_sim::{
    protocols::Delays,
    types::{ParseProtocolError, Protocol},
};
use serde::Deserialize;
use std::{fmt, fs, path::Path};

/// Settings read from an optional TOML file, for example:
///
/// ```toml
/// initial_tab = "mqtt"
///
/// [delays]
/// soap_ms = 2000
/// mqtt_deliver_ms = 100
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub initial_tab: String,
    pub delays: Delays,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self { initial_tab: Protocol::Rest.name().to_string(), delays: Delays::default() }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    InvalidTab(ParseProtocolError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "could not read config: {}", err),
            ConfigError::Toml(err) => write!(f, "invalid config: {}", err),
            ConfigError::InvalidTab(err) => write!(f, "invalid initial_tab: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Toml(err)
    }
}

impl From<ParseProtocolError> for ConfigError {
    fn from(err: ParseProtocolError) -> Self {
        ConfigError::InvalidTab(err)
    }
}

impl PlaygroundConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: PlaygroundConfig = toml::from_str(contents)?;
        config.initial_tab()?;

        Ok(config)
    }

    pub fn initial_tab(&self) -> Result<Protocol, ParseProtocolError> {
        self.initial_tab.parse()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigError, PlaygroundConfig};
    use protocol_sim::{protocols::Delays, types::Protocol};

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = PlaygroundConfig::from_toml("").unwrap();

        assert_eq!(config, PlaygroundConfig::default());
        assert_eq!(config.initial_tab().unwrap(), Protocol::Rest);
    }

    #[test]
    fn test_overrides() {
        let config = PlaygroundConfig::from_toml(
            r#"
            initial_tab = "mqtt"

            [delays]
            soap_ms = 2000
            mqtt_deliver_ms = 100
            "#,
        )
        .unwrap();

        assert_eq!(config.initial_tab().unwrap(), Protocol::Mqtt);
        assert_eq!(config.delays.soap_ms, 2000);
        assert_eq!(config.delays.mqtt_deliver_ms, 100);
        assert_eq!(config.delays.rest_base_ms, Delays::default().rest_base_ms);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            PlaygroundConfig::from_toml("initial_tab = \"gopher\""),
            Err(ConfigError::InvalidTab(_))
        ));
        assert!(matches!(
            PlaygroundConfig::from_toml("[delays]\nsoap_ms = \"slow\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
