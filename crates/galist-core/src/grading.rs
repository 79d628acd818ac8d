//! Submission grading.
//!
//! A submission is compared link by link against the expected structure.
//! Each expected node contributes one adjacency: its next pointer must reach
//! the following node's circle, or nothing at all for the tail. The score is
//! the share of satisfied adjacencies; correctness additionally requires
//! that no node is missing, extra or dangling.

use std::collections::{HashMap, HashSet};

use crate::exercise::ExerciseInstance;
use crate::model::{Circle, Submission, ValidationResult, TOTAL_POINTS};

const PERFECT: &str = "Perfect! Your linked list is completely correct!";
const PERFECT_WITH_ORDER: &str =
    "Perfect! Your linked list is correct and entered the portal in proper order!";
const WRONG_ORDER: &str = "Linked list is correct but portal entry order was wrong!";

/// One problem found in a submission.
#[derive(Debug)]
struct Finding {
    headline: &'static str,
    detail: String,
}

impl Finding {
    fn new(headline: &'static str, detail: impl Into<String>) -> Self {
        Self {
            headline,
            detail: detail.into(),
        }
    }
}

/// Grade `submission` against the exercise's expected structure.
///
/// `entry_order` lists circle ids in the order the learner finalized them.
/// It breaks ties between circles sharing a value and, for a correct list,
/// is checked against the head-to-tail traversal.
pub fn grade(
    exercise: &ExerciseInstance,
    submission: &Submission,
    entry_order: Option<&[String]>,
) -> ValidationResult {
    let nodes = exercise.expected_structure();
    let template = exercise.template();
    let mut findings = Vec::new();

    if submission.circles.len() != nodes.len() {
        findings.push(Finding::new(
            "Wrong number of nodes!",
            format!(
                "Expected {} nodes, but found {} nodes.",
                nodes.len(),
                submission.circles.len()
            ),
        ));
    }

    for circle in &submission.circles {
        if template.address_of(circle.value).is_none() {
            findings.push(Finding::new(
                "Unexpected value found!",
                format!("Value {} is not part of this exercise.", circle.value),
            ));
        }
    }

    // Resolve every expected node to at most one circle.
    let entry_positions: HashMap<&str, usize> = entry_order
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let mut by_value: HashMap<i64, Vec<&Circle>> = HashMap::new();
    for circle in &submission.circles {
        by_value.entry(circle.value).or_default().push(circle);
    }

    let mut claimed: Vec<Option<&Circle>> = Vec::with_capacity(nodes.len());
    let mut claimed_ids: HashSet<&str> = HashSet::new();
    for (index, node) in nodes.iter().enumerate() {
        let candidates = by_value.get(&node.value).map(Vec::as_slice).unwrap_or_default();
        let chosen = pick_candidate(candidates, index, &entry_positions);
        match chosen {
            Some(circle) => {
                claimed_ids.insert(circle.id.as_str());
                for extra in candidates.iter().filter(|c| !std::ptr::eq(**c, circle)) {
                    findings.push(Finding::new(
                        "Duplicate node!",
                        format!(
                            "Value {} appears on more than one node; \"{}\" is extra.",
                            node.value, extra.id
                        ),
                    ));
                }
            }
            None => findings.push(Finding::new(
                "Missing node!",
                format!("No node holds value {} ({}).", node.value, node.address),
            )),
        }
        claimed.push(chosen);
    }

    let mut address_ok = vec![false; nodes.len()];
    for (i, (node, circle)) in nodes.iter().zip(&claimed).enumerate() {
        let Some(circle) = circle else { continue };
        if circle.address == node.address {
            address_ok[i] = true;
        } else {
            findings.push(Finding::new(
                "Wrong address mapping!",
                format!(
                    "Value {} should have address \"{}\", but has \"{}\".",
                    node.value, node.address, circle.address
                ),
            ));
        }
    }

    let expected_connections = nodes.len().saturating_sub(1);
    if submission.connections.len() != expected_connections {
        findings.push(Finding::new(
            "Wrong number of connections!",
            format!(
                "Expected {expected_connections} connections, but found {} connections.",
                submission.connections.len()
            ),
        ));
    }

    let outgoing = submission.outgoing();
    let known_ids: HashSet<&str> = submission.circles.iter().map(|c| c.id.as_str()).collect();
    let describe = |id: &str| -> String {
        submission
            .circle(id)
            .map(|c| c.value.to_string())
            .unwrap_or_else(|| format!("\"{id}\""))
    };

    if let (Some(Some(head)), Some(head_node)) = (claimed.first(), nodes.first()) {
        if submission.connections.iter().any(|c| c.to == head.id) {
            findings.push(Finding::new(
                "Head node error!",
                format!(
                    "The first node ({}) should not have any incoming connections.",
                    head_node.value
                ),
            ));
        }
    }

    let mut matched = 0u32;
    for (i, node) in nodes.iter().enumerate() {
        let Some(circle) = claimed[i] else { continue };
        let targets = outgoing
            .get(circle.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let satisfied = if node.is_tail() {
            if !targets.is_empty() {
                findings.push(Finding::new(
                    "Tail node error!",
                    format!(
                        "The last node ({}) should not have any outgoing connections.",
                        node.value
                    ),
                ));
            }
            targets.is_empty()
        } else {
            let next_node = &nodes[i + 1];
            let next_id = claimed[i + 1].map(|c| c.id.as_str());
            let hits = targets.iter().filter(|t| Some(**t) == next_id).count();

            if next_id.is_some() && hits == 0 {
                findings.push(Finding::new(
                    "Missing connection!",
                    format!(
                        "Expected connection from {} ({}) to {} ({}).",
                        node.value, node.address, next_node.value, next_node.address
                    ),
                ));
            }
            if hits > 1 {
                findings.push(Finding::new(
                    "Invalid connection!",
                    format!(
                        "Found duplicate connection from {} to {}.",
                        node.value, next_node.value
                    ),
                ));
            }
            for target in targets
                .iter()
                .filter(|t| Some(**t) != next_id && known_ids.contains(**t))
            {
                findings.push(Finding::new(
                    "Invalid connection!",
                    format!(
                        "Found unexpected connection from {} to {}. Only sequential connections are allowed.",
                        node.value,
                        describe(*target)
                    ),
                ));
            }

            next_id.is_some() && hits == 1 && targets.len() == 1
        };

        if satisfied && address_ok[i] {
            matched += 1;
        }
    }

    for conn in &submission.connections {
        if !known_ids.contains(conn.from.as_str()) || !known_ids.contains(conn.to.as_str()) {
            findings.push(Finding::new(
                "Invalid connection!",
                format!(
                    "Connection from \"{}\" to \"{}\" does not join two nodes.",
                    conn.from, conn.to
                ),
            ));
        } else if !claimed_ids.contains(conn.from.as_str()) {
            findings.push(Finding::new(
                "Invalid connection!",
                format!(
                    "Found connection from {} to {}, but {} is not part of the list.",
                    describe(conn.from.as_str()),
                    describe(conn.to.as_str()),
                    describe(conn.from.as_str())
                ),
            ));
        }
    }

    let total = nodes.len() as u32;
    let score = if total == 0 {
        0
    } else {
        matched * TOTAL_POINTS / total
    };

    if findings.is_empty() {
        return perfect(exercise, submission, entry_order);
    }

    let mut details: Vec<String> = findings.iter().map(|f| f.detail.clone()).collect();
    details.push(format!("Matched {matched} of {total} links."));

    tracing::debug!(
        "graded '{}': {matched}/{total} links, {} finding(s)",
        exercise.key(),
        findings.len()
    );

    ValidationResult {
        is_correct: false,
        message: findings[0].headline.to_string(),
        details: details.join("\n"),
        score,
        total_points: TOTAL_POINTS,
    }
}

/// Check that circles entered the portal in head-to-tail order.
///
/// Returns a description of the first mismatch.
pub fn verify_entry_order(submission: &Submission, entry_order: &[String]) -> Result<(), String> {
    let correct = submission.traversal_order().or_else(|| match submission.circles.as_slice() {
        [only] => Some(vec![only.id.clone()]),
        _ => None,
    });
    let Some(correct) = correct else {
        return Err("Could not determine correct traversal order".into());
    };

    if entry_order.len() != correct.len() {
        return Err(format!(
            "Expected {} circles to enter portal, but {} entered",
            correct.len(),
            entry_order.len()
        ));
    }

    let value_of = |id: &str| {
        submission
            .circle(id)
            .map(|c| c.value.to_string())
            .unwrap_or_else(|| "unknown".into())
    };
    for (i, (entered, expected)) in entry_order.iter().zip(&correct).enumerate() {
        if entered != expected {
            return Err(format!(
                "Wrong portal entry order! Expected {} at position {}, but got {}",
                value_of(expected.as_str()),
                i + 1,
                value_of(entered.as_str())
            ));
        }
    }

    Ok(())
}

fn perfect(
    exercise: &ExerciseInstance,
    submission: &Submission,
    entry_order: Option<&[String]>,
) -> ValidationResult {
    let mut details = vec![
        format!("Correct values: [{}]", exercise.template().chain()),
        "Correct addresses".to_string(),
        "Perfect structure".to_string(),
        "All connections valid".to_string(),
    ];

    let message = match entry_order.filter(|order| !order.is_empty()) {
        Some(order) => match verify_entry_order(submission, order) {
            Ok(()) => {
                details.push("Perfect portal entry order!".to_string());
                PERFECT_WITH_ORDER
            }
            Err(problem) => {
                details.push(problem);
                WRONG_ORDER
            }
        },
        None => PERFECT,
    };

    ValidationResult {
        is_correct: true,
        message: message.to_string(),
        details: details.join("\n"),
        score: TOTAL_POINTS,
        total_points: TOTAL_POINTS,
    }
}

/// Choose which of several same-valued circles stands for the node at
/// `index`: the one entered at that position, else the earliest entered,
/// else the first submitted.
fn pick_candidate<'a>(
    candidates: &[&'a Circle],
    index: usize,
    entry_positions: &HashMap<&str, usize>,
) -> Option<&'a Circle> {
    match candidates {
        [] => None,
        [only] => Some(*only),
        _ => candidates
            .iter()
            .copied()
            .find(|c| entry_positions.get(c.id.as_str()) == Some(&index))
            .or_else(|| {
                candidates
                    .iter()
                    .copied()
                    .filter_map(|c| entry_positions.get(c.id.as_str()).map(|pos| (pos, c)))
                    .min_by_key(|(pos, _)| **pos)
                    .map(|(_, c)| c)
            })
            .or_else(|| candidates.first().copied()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Connection;
    use crate::templates::TemplateRegistry;

    fn exercise(key: &str) -> ExerciseInstance {
        ExerciseInstance::new(TemplateRegistry::builtin().get(key).unwrap()).unwrap()
    }

    /// Circles `n<value>` carrying the right addresses, chained head to tail.
    fn perfect_submission(exercise: &ExerciseInstance) -> Submission {
        let nodes = exercise.expected_structure();
        Submission {
            circles: nodes
                .iter()
                .map(|n| Circle::new(format!("n{}", n.value), n.value, n.address.clone()))
                .collect(),
            connections: nodes
                .windows(2)
                .map(|w| Connection::new(format!("n{}", w[0].value), format!("n{}", w[1].value)))
                .collect(),
        }
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn perfect_submission_scores_full() {
        for key in ["exercise_one", "exercise_two", "exercise_three"] {
            let ex = exercise(key);
            let result = grade(&ex, &perfect_submission(&ex), None);
            assert!(result.is_correct, "{key}: {}", result.details);
            assert_eq!(result.score, result.total_points);
            assert_eq!(result.message, PERFECT);
        }
    }

    #[test]
    fn duplicate_connection_loses_credit_for_that_link() {
        let ex = exercise("exercise_one");
        let mut submission = perfect_submission(&ex);
        submission.connections.push(Connection::new("n5", "n10"));

        let result = grade(&ex, &submission, None);
        assert!(!result.is_correct);
        assert_eq!(result.score, 80);
        assert_eq!(result.message, "Wrong number of connections!");
        assert!(result
            .details
            .lines()
            .any(|l| l == "Found duplicate connection from 5 to 10."));
        assert!(result.details.ends_with("Matched 4 of 5 links."));
    }

    #[test]
    fn empty_submission_scores_zero() {
        let ex = exercise("exercise_one");
        let result = grade(&ex, &Submission::default(), None);
        assert!(!result.is_correct);
        assert_eq!(result.score, 0);
        assert_eq!(result.total_points, 100);
        assert_eq!(result.message, "Wrong number of nodes!");
        assert!(result.details.contains("Expected 5 nodes, but found 0 nodes."));
    }

    #[test]
    fn one_missing_connection_gives_partial_credit() {
        let ex = exercise("exercise_one");
        let mut submission = perfect_submission(&ex);
        submission.connections.retain(|c| c.from != "n15");

        let result = grade(&ex, &submission, None);
        assert!(!result.is_correct);
        assert!(result.score > 0 && result.score < result.total_points);
        assert_eq!(result.score, 80);
        assert!(result
            .details
            .contains("Expected connection from 15 (cc) to 20 (dd)."));
        assert!(result.details.contains("Matched 4 of 5 links."));
    }

    #[test]
    fn wrong_address_costs_that_node() {
        let ex = exercise("exercise_one");
        let mut submission = perfect_submission(&ex);
        submission.circles[1].address = "zz".into();

        let result = grade(&ex, &submission, None);
        assert!(!result.is_correct);
        assert_eq!(result.message, "Wrong address mapping!");
        assert_eq!(result.score, 80);
        assert!(result
            .details
            .contains("Value 10 should have address \"bb\", but has \"zz\"."));
    }

    #[test]
    fn reversed_list_scores_zero() {
        let ex = exercise("exercise_one");
        let mut submission = perfect_submission(&ex);
        for conn in &mut submission.connections {
            std::mem::swap(&mut conn.from, &mut conn.to);
        }

        let result = grade(&ex, &submission, None);
        assert!(!result.is_correct);
        assert_eq!(result.score, 0);
        assert!(result.details.contains("should not have any incoming connections"));
        assert!(result.details.contains("should not have any outgoing connections"));
    }

    #[test]
    fn extra_node_is_never_correct() {
        let ex = exercise("exercise_one");
        let mut submission = perfect_submission(&ex);
        submission.circles.push(Circle::new("n99", 99, "zz"));

        let result = grade(&ex, &submission, None);
        assert!(!result.is_correct);
        assert_eq!(result.message, "Wrong number of nodes!");
        assert!(result.details.contains("Value 99 is not part of this exercise."));
    }

    #[test]
    fn connections_from_extra_nodes_are_flagged() {
        let ex = exercise("exercise_one");
        let mut submission = perfect_submission(&ex);
        submission.circles.push(Circle::new("n99", 99, "zz"));
        submission.connections.push(Connection::new("n99", "n5"));

        let result = grade(&ex, &submission, None);
        assert!(result
            .details
            .contains("Found connection from 99 to 5, but 99 is not part of the list."));
        assert!(result.details.contains("The first node (5) should not have any incoming"));
    }

    #[test]
    fn dangling_connection_is_flagged() {
        let ex = exercise("exercise_one");
        let mut submission = perfect_submission(&ex);
        submission.connections.push(Connection::new("n25", "ghost"));

        let result = grade(&ex, &submission, None);
        assert!(!result.is_correct);
        assert_eq!(result.score, 80);
        assert!(result
            .details
            .contains("Connection from \"n25\" to \"ghost\" does not join two nodes."));
    }

    #[test]
    fn skipping_a_node_is_an_invalid_connection() {
        let ex = exercise("exercise_one");
        let mut submission = perfect_submission(&ex);
        submission.connections.push(Connection::new("n5", "n15"));

        let result = grade(&ex, &submission, None);
        assert!(!result.is_correct);
        assert_eq!(result.score, 80);
        assert!(result.details.contains("Found unexpected connection from 5 to 15."));
    }

    #[test]
    fn score_grows_with_correct_links() {
        let ex = exercise("exercise_one");
        let full = perfect_submission(&ex);
        let mut previous = 0;
        for built in 0..=full.connections.len() {
            let partial = Submission {
                circles: full.circles.clone(),
                connections: full.connections[..built].to_vec(),
            };
            let result = grade(&ex, &partial, None);
            assert!(result.score >= previous, "score dropped at {built} links");
            previous = result.score;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn entry_order_picks_between_duplicate_values() {
        let ex = exercise("exercise_one");
        let submission = Submission {
            circles: vec![
                Circle::new("a", 5, "aa"),
                Circle::new("b", 10, "bb"),
                Circle::new("b2", 10, "bb"),
                Circle::new("c", 15, "cc"),
                Circle::new("d", 20, "dd"),
                Circle::new("e", 25, "ee"),
            ],
            connections: vec![
                Connection::new("a", "b2"),
                Connection::new("b2", "c"),
                Connection::new("c", "d"),
                Connection::new("d", "e"),
            ],
        };

        let without_order = grade(&ex, &submission, None);
        let order = ids(&["a", "b2", "c", "d", "e"]);
        let with_order = grade(&ex, &submission, Some(&order));

        assert!(!without_order.is_correct);
        assert!(!with_order.is_correct);
        assert!(with_order.score > without_order.score);
        assert_eq!(with_order.score, 100);
        assert!(with_order.details.contains("\"b\" is extra"));
    }

    #[test]
    fn entry_order_in_list_order() {
        let ex = exercise("exercise_one");
        let order = ids(&["n5", "n10", "n15", "n20", "n25"]);
        let result = grade(&ex, &perfect_submission(&ex), Some(&order));
        assert!(result.is_correct);
        assert_eq!(result.message, PERFECT_WITH_ORDER);
        assert!(result.details.contains("Perfect portal entry order!"));
    }

    #[test]
    fn entry_order_out_of_order_keeps_full_score() {
        let ex = exercise("exercise_one");
        let order = ids(&["n5", "n15", "n10", "n20", "n25"]);
        let result = grade(&ex, &perfect_submission(&ex), Some(&order));
        assert!(result.is_correct);
        assert_eq!(result.score, 100);
        assert_eq!(result.message, WRONG_ORDER);
        assert!(result
            .details
            .contains("Expected 10 at position 2, but got 15"));
    }

    #[test]
    fn empty_entry_order_is_ignored() {
        let ex = exercise("exercise_one");
        let result = grade(&ex, &perfect_submission(&ex), Some(&[]));
        assert_eq!(result.message, PERFECT);
    }

    #[test]
    fn verify_entry_order_length_mismatch() {
        let ex = exercise("exercise_one");
        let err = verify_entry_order(&perfect_submission(&ex), &ids(&["n5"])).unwrap_err();
        assert_eq!(err, "Expected 5 circles to enter portal, but 1 entered");
    }

    #[test]
    fn single_node_exercise() {
        let template = crate::model::Template::from_pairs("solo", "", "", &[(7, "z1")]);
        let ex = ExerciseInstance::new(&template).unwrap();
        let submission = Submission {
            circles: vec![Circle::new("only", 7, "z1")],
            connections: vec![],
        };
        let order = ids(&["only"]);
        let result = grade(&ex, &submission, Some(&order));
        assert!(result.is_correct);
        assert_eq!(result.message, PERFECT_WITH_ORDER);
    }
}
