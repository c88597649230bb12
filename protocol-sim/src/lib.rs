pub const TOPIC_SEPARATOR: char = '/';

pub const MULTI_LEVEL_WILDCARD: char = '#';
pub const MULTI_LEVEL_WILDCARD_STR: &str = "#";

pub const SINGLE_LEVEL_WILDCARD: char = '+';
pub const SINGLE_LEVEL_WILDCARD_STR: &str = "+";

pub const MAX_TOPIC_LEN_BYTES: usize = 65_535;

pub mod info;
pub mod mock;
pub mod protocols;
pub mod sim;
pub mod topic;
pub mod types;
