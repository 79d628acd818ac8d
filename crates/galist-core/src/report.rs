//! Progress summaries and grade reports with JSON persistence.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::exercise::ExerciseInstance;
use crate::model::{Submission, ValidationResult};

/// How far a learner has got with an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub nodes_created: usize,
    pub expected_nodes: usize,
    pub connections_created: usize,
    pub expected_connections: usize,
    /// Circles whose value belongs to the exercise.
    pub correct_values: usize,
    /// Circles carrying the address their value should have.
    pub correct_addresses: usize,
    /// Whether the node and connection counts line up and the links are right.
    pub has_valid_structure: bool,
}

impl ProgressReport {
    pub fn build(exercise: &ExerciseInstance, submission: &Submission) -> Self {
        let template = exercise.template();
        let expected_nodes = exercise.sequence().len();
        let expected_connections = expected_nodes.saturating_sub(1);

        let values: HashSet<i64> = template.sequence.iter().copied().collect();
        let correct_values = submission
            .circles
            .iter()
            .filter(|c| values.contains(&c.value))
            .count();
        let correct_addresses = submission
            .circles
            .iter()
            .filter(|c| template.address_of(c.value) == Some(c.address.as_str()))
            .count();

        let has_valid_structure = submission.circles.len() == expected_nodes
            && submission.connections.len() == expected_connections
            && exercise.validate(submission, None).is_correct;

        Self {
            nodes_created: submission.circles.len(),
            expected_nodes,
            connections_created: submission.connections.len(),
            expected_connections,
            correct_values,
            correct_addresses,
            has_valid_structure,
        }
    }
}

/// One graded attempt, as written by `galist grade --format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the attempt was graded.
    pub created_at: DateTime<Utc>,
    /// Key of the graded template.
    pub template: String,
    pub result: ValidationResult,
    pub progress: ProgressReport,
}

impl GradeReport {
    pub fn new(exercise: &ExerciseInstance, submission: &Submission, result: ValidationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            template: exercise.key().to_string(),
            result,
            progress: exercise.progress_report(submission),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradeReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**{}** ({}): {} / {} ({:.0}%)\n\n",
            self.result.message,
            self.template,
            self.result.score,
            self.result.total_points,
            self.result.ratio() * 100.0
        ));
        md.push_str("| Nodes | Connections | Correct values | Correct addresses |\n");
        md.push_str("|-------|-------------|----------------|-------------------|\n");
        md.push_str(&format!(
            "| {}/{} | {}/{} | {} | {} |\n\n",
            self.progress.nodes_created,
            self.progress.expected_nodes,
            self.progress.connections_created,
            self.progress.expected_connections,
            self.progress.correct_values,
            self.progress.correct_addresses,
        ));
        for line in self.result.details.lines() {
            md.push_str(&format!("- {line}\n"));
        }

        md
    }
}
