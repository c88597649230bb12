use crate::{
    MAX_TOPIC_LEN_BYTES, MULTI_LEVEL_WILDCARD, MULTI_LEVEL_WILDCARD_STR, SINGLE_LEVEL_WILDCARD,
    SINGLE_LEVEL_WILDCARD_STR, TOPIC_SEPARATOR,
};
use std::fmt;

/// A topic name a simulated publisher sends to.
/// Wildcards aren't expected here, but they are not rejected either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    topic_name: String,
    level_count: u32,
}

/// A filter for subscribers to indicate which topics they want
/// to receive messages from. Can contain wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFilter {
    filter: String,
    level_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicLevel<'a> {
    Concrete(&'a str),
    SingleLevelWildcard,
    MultiLevelWildcard,
}

/// Reasons a filter would be refused by a conforming MQTT server.
/// Matching never fails on these, they are only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicParseError {
    EmptyTopic,
    TopicTooLong,
    MultilevelWildcardNotAtEnd,
    InvalidWildcardLevel,
    NullCharacter,
}

impl fmt::Display for TopicParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            TopicParseError::EmptyTopic => "topic filter is empty",
            TopicParseError::TopicTooLong => "topic filter is longer than 65535 bytes",
            TopicParseError::MultilevelWildcardNotAtEnd => "'#' is only allowed as the last level",
            TopicParseError::InvalidWildcardLevel => "wildcards must occupy a whole level",
            TopicParseError::NullCharacter => "topic filter contains a null character",
        };

        f.write_str(msg)
    }
}

impl std::error::Error for TopicParseError {}

fn count_levels(s: &str) -> u32 {
    s.split(TOPIC_SEPARATOR).count() as u32
}

impl Topic {
    pub fn new(topic_name: &str) -> Self {
        Self { topic_name: topic_name.to_string(), level_count: count_levels(topic_name) }
    }

    pub fn as_str(&self) -> &str {
        &self.topic_name
    }

    pub fn level_count(&self) -> u32 {
        self.level_count
    }

    pub fn levels(&self) -> TopicLevels<'_> {
        TopicLevels { levels_iter: self.topic_name.split(TOPIC_SEPARATOR) }
    }
}

impl TopicFilter {
    pub fn new(filter: &str) -> Self {
        Self { filter: filter.to_string(), level_count: count_levels(filter) }
    }

    pub fn as_str(&self) -> &str {
        &self.filter
    }

    pub fn level_count(&self) -> u32 {
        self.level_count
    }

    pub fn levels(&self) -> TopicLevels<'_> {
        TopicLevels { levels_iter: self.filter.split(TOPIC_SEPARATOR) }
    }

    pub fn is_wildcard(&self) -> bool {
        self.levels().any(|level| !matches!(level, TopicLevel::Concrete(_)))
    }

    /// Check the filter against the MQTT rules for subscription filters.
    pub fn validate(&self) -> Result<(), TopicParseError> {
        let filter = self.filter.as_str();

        if filter.is_empty() {
            return Err(TopicParseError::EmptyTopic);
        }

        if filter.contains('\0') {
            return Err(TopicParseError::NullCharacter);
        }

        if filter.len() > MAX_TOPIC_LEN_BYTES {
            return Err(TopicParseError::TopicTooLong);
        }

        if let Some(pos) = filter.rfind(MULTI_LEVEL_WILDCARD) {
            if pos != filter.len() - 1 {
                return Err(TopicParseError::MultilevelWildcardNotAtEnd);
            }
        }

        for level in filter.split(TOPIC_SEPARATOR) {
            // Any wildcards on a particular level must be specified on their own
            let has_wildcard =
                level.contains(|x: char| x == SINGLE_LEVEL_WILDCARD || x == MULTI_LEVEL_WILDCARD);

            if has_wildcard && level.len() > 1 {
                return Err(TopicParseError::InvalidWildcardLevel);
            }
        }

        Ok(())
    }

    pub fn matches(&self, topic: &Topic) -> bool {
        matches(topic.as_str(), self.as_str())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.topic_name)
    }
}

impl fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filter)
    }
}

pub struct TopicLevels<'a> {
    levels_iter: std::str::Split<'a, char>,
}

impl<'a> Iterator for TopicLevels<'a> {
    type Item = TopicLevel<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.levels_iter.next() {
            Some(MULTI_LEVEL_WILDCARD_STR) => Some(TopicLevel::MultiLevelWildcard),
            Some(SINGLE_LEVEL_WILDCARD_STR) => Some(TopicLevel::SingleLevelWildcard),
            Some(level) => Some(TopicLevel::Concrete(level)),
            None => None,
        }
    }
}

/// Decide whether `filter` selects `topic`.
///
/// Both strings are split on `/` and compared level by level. `+` accepts any
/// single level and `#` accepts whatever remains, including nothing. This
/// never fails: empty or otherwise malformed input is compared as-is.
pub fn matches(topic: &str, filter: &str) -> bool {
    if filter == MULTI_LEVEL_WILDCARD_STR {
        return true;
    }

    let topic_levels: Vec<&str> = topic.split(TOPIC_SEPARATOR).collect();
    let filter_levels: Vec<TopicLevel> =
        TopicLevels { levels_iter: filter.split(TOPIC_SEPARATOR) }.collect();

    // A filter may only outgrow the topic by a single trailing '#'
    if filter_levels.len() > topic_levels.len() {
        let extra = &filter_levels[topic_levels.len()..];

        if extra != [TopicLevel::MultiLevelWildcard] {
            return false;
        }
    }

    for (index, level) in filter_levels.iter().enumerate() {
        match level {
            TopicLevel::MultiLevelWildcard => return true,
            TopicLevel::SingleLevelWildcard => {},
            TopicLevel::Concrete(level) => {
                if topic_levels.get(index) != Some(level) {
                    return false;
                }
            },
        }
    }

    topic_levels.len() == filter_levels.len()
}
