//! The fixed user records every simulated server answers with.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
}

impl User {
    fn new(id: u32, name: &str, email: &str) -> Self {
        Self { id, name: name.to_string(), email: email.to_string() }
    }
}

pub fn users() -> Vec<User> {
    vec![
        User::new(1, "Albus", "a@b.com"),
        User::new(2, "Severus", "s@b.com"),
        User::new(3, "Minerva", "m@b.com"),
    ]
}

pub fn users_sorted_by_name() -> Vec<User> {
    let mut users = users();
    users.sort_by(|a, b| a.name.cmp(&b.name));
    users
}

/// Pretty-print a payload the way the response panes show it.
pub fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use crate::mock::{to_pretty_json, users, users_sorted_by_name};

    #[test]
    fn test_sorted_order() {
        let names: Vec<String> = users_sorted_by_name().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Albus", "Minerva", "Severus"]);
    }

    #[test]
    fn test_pretty_json_uses_two_spaces() {
        let json = to_pretty_json(&users()[0]);
        assert_eq!(json, "{\n  \"id\": 1,\n  \"name\": \"Albus\",\n  \"email\": \"a@b.com\"\n}");
    }
}
