//! Core data model types for galist.
//!
//! These are the shapes exchanged with the presentation layer: exercise
//! templates, the learner's circles and connections, and graded results.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

/// Marker used in place of an address when a node has no further link.
pub const NULL_ADDRESS: &str = "null";

/// Points available for a single graded attempt.
pub const TOTAL_POINTS: u32 = 100;

/// Static definition of a target linked list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Registry key (e.g. "exercise_one").
    pub key: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Display description.
    #[serde(default)]
    pub description: String,
    /// Node values in list order, head first.
    pub sequence: Vec<i64>,
    /// Address assigned to each value.
    pub addresses: BTreeMap<i64, String>,
}

impl Template {
    /// Build a template from `(value, address)` pairs in list order.
    pub fn from_pairs(
        key: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        pairs: &[(i64, &str)],
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            description: description.into(),
            sequence: pairs.iter().map(|(value, _)| *value).collect(),
            addresses: pairs
                .iter()
                .map(|(value, address)| (*value, (*address).to_string()))
                .collect(),
        }
    }

    /// Address assigned to `value`, if any.
    pub fn address_of(&self, value: i64) -> Option<&str> {
        self.addresses.get(&value).map(String::as_str)
    }

    /// Render the sequence as `a -> b -> c`.
    pub fn chain(&self) -> String {
        self.sequence
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Check the registry contract: non-empty sequence, unique values,
    /// every value addressed, unique addresses.
    ///
    /// Returns a description of the first violation.
    pub fn check(&self) -> Result<(), String> {
        if self.sequence.is_empty() {
            return Err("sequence is empty".into());
        }

        let mut seen_values = HashSet::new();
        let mut seen_addresses = HashSet::new();
        for value in &self.sequence {
            if !seen_values.insert(*value) {
                return Err(format!("value {value} appears more than once"));
            }
            let Some(address) = self.addresses.get(value) else {
                return Err(format!("value {value} has no address"));
            };
            if address.trim().is_empty() || address == NULL_ADDRESS {
                return Err(format!("value {value} has an unusable address \"{address}\""));
            }
            if !seen_addresses.insert(address.as_str()) {
                return Err(format!("address \"{address}\" is assigned more than once"));
            }
        }

        Ok(())
    }
}

/// One derived node of the expected list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedNode {
    pub value: i64,
    pub address: String,
    /// Address of the preceding node, or [`NULL_ADDRESS`] at the head.
    pub prev_address: String,
    /// Address of the following node, or [`NULL_ADDRESS`] at the tail.
    pub next_address: String,
    /// Singly-linked view of `next_address`.
    pub next: String,
}

impl ExpectedNode {
    pub fn is_head(&self) -> bool {
        self.prev_address == NULL_ADDRESS
    }

    pub fn is_tail(&self) -> bool {
        self.next_address == NULL_ADDRESS
    }
}

/// A node the learner built on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub id: String,
    #[serde(deserialize_with = "int_or_numeric_string")]
    pub value: i64,
    #[serde(default)]
    pub address: String,
}

impl Circle {
    pub fn new(id: impl Into<String>, value: i64, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value,
            address: address.into(),
        }
    }
}

/// A next-pointer the learner drew from one circle to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A learner's complete answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub circles: Vec<Circle>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Submission {
    /// Capture an independent copy of the caller's live collections.
    pub fn capture(circles: &[Circle], connections: &[Connection]) -> Self {
        Self {
            circles: circles.to_vec(),
            connections: connections.to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty() && self.connections.is_empty()
    }

    pub fn circle(&self, id: &str) -> Option<&Circle> {
        self.circles.iter().find(|c| c.id == id)
    }

    /// Outgoing connections grouped by source circle id.
    pub fn outgoing(&self) -> HashMap<&str, Vec<&str>> {
        let mut map: HashMap<&str, Vec<&str>> = HashMap::new();
        for conn in &self.connections {
            map.entry(conn.from.as_str()).or_default().push(conn.to.as_str());
        }
        map
    }

    /// Circle ids from the head to the tail, following next pointers.
    ///
    /// The head is the first circle with an outgoing connection and no
    /// incoming one. Traversal stops at the first revisited circle.
    pub fn traversal_order(&self) -> Option<Vec<String>> {
        let has_incoming: HashSet<&str> = self.connections.iter().map(|c| c.to.as_str()).collect();
        let has_outgoing: HashSet<&str> =
            self.connections.iter().map(|c| c.from.as_str()).collect();

        let head = self.circles.iter().find(|c| {
            has_outgoing.contains(c.id.as_str()) && !has_incoming.contains(c.id.as_str())
        })?;

        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(head.id.as_str());
        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            order.push(id.to_string());
            current = self
                .connections
                .iter()
                .find(|c| c.from == id)
                .map(|c| c.to.as_str());
        }

        Some(order)
    }
}

/// Graded outcome of one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_correct: bool,
    /// Headline feedback.
    pub message: String,
    /// Line-per-finding feedback.
    pub details: String,
    pub score: u32,
    pub total_points: u32,
}

impl ValidationResult {
    /// A graded "try again" result with no points awarded.
    pub fn failure(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            is_correct: false,
            message: message.into(),
            details: details.into(),
            score: 0,
            total_points: TOTAL_POINTS,
        }
    }

    /// Score as a fraction of the available points.
    pub fn ratio(&self) -> f64 {
        if self.total_points == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total_points)
    }
}

fn int_or_numeric_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("circle value is not a number: {text}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_template() -> Template {
        Template::from_pairs("t", "T", "", &[(5, "aa"), (10, "bb"), (15, "cc")])
    }

    #[test]
    fn template_check_accepts_valid() {
        assert!(sample_template().check().is_ok());
    }

    #[test]
    fn template_check_rejects_violations() {
        let mut empty = sample_template();
        empty.sequence.clear();
        assert!(empty.check().unwrap_err().contains("empty"));

        let mut dup_value = sample_template();
        dup_value.sequence.push(5);
        assert!(dup_value.check().unwrap_err().contains("more than once"));

        let mut missing = sample_template();
        missing.addresses.remove(&10);
        assert!(missing.check().unwrap_err().contains("no address"));

        let mut dup_address = sample_template();
        dup_address.addresses.insert(15, "aa".into());
        assert!(dup_address.check().unwrap_err().contains("\"aa\""));

        let mut null_address = sample_template();
        null_address.addresses.insert(15, NULL_ADDRESS.into());
        assert!(null_address.check().is_err());
    }

    #[test]
    fn chain_renders_arrows() {
        assert_eq!(sample_template().chain(), "5 -> 10 -> 15");
    }

    #[test]
    fn circle_value_accepts_numeric_string() {
        let circle: Circle =
            serde_json::from_str(r#"{"id":"c1","value":"42","address":"aa"}"#).unwrap();
        assert_eq!(circle.value, 42);

        let circle: Circle = serde_json::from_str(r#"{"id":"c1","value":7}"#).unwrap();
        assert_eq!(circle.value, 7);
        assert!(circle.address.is_empty());

        let bad = serde_json::from_str::<Circle>(r#"{"id":"c1","value":"seven"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn traversal_follows_pointers_from_head() {
        let submission = Submission {
            circles: vec![
                Circle::new("b", 10, "bb"),
                Circle::new("a", 5, "aa"),
                Circle::new("c", 15, "cc"),
            ],
            connections: vec![Connection::new("b", "c"), Connection::new("a", "b")],
        };
        assert_eq!(
            submission.traversal_order().unwrap(),
            vec!["a".to_string(), "b".into(), "c".into()]
        );
    }

    #[test]
    fn capture_copies_and_reports_emptiness() {
        let mut circles = vec![Circle::new("a", 5, "aa")];
        let submission = Submission::capture(&circles, &[]);
        circles.clear();
        assert_eq!(submission.circles.len(), 1);
        assert!(!submission.is_empty());
        assert!(Submission::capture(&circles, &[]).is_empty());
    }

    #[test]
    fn traversal_without_head_is_none() {
        let cycle = Submission {
            circles: vec![Circle::new("a", 1, "x"), Circle::new("b", 2, "y")],
            connections: vec![Connection::new("a", "b"), Connection::new("b", "a")],
        };
        assert!(cycle.traversal_order().is_none());
        assert!(Submission::default().traversal_order().is_none());
    }

    #[test]
    fn validation_result_serializes_camel_case() {
        let result = ValidationResult::failure("No submission found", "Please create your linked list first.");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isCorrect"], false);
        assert_eq!(json["totalPoints"], 100);
        assert_eq!(result.ratio(), 0.0);
    }
}
