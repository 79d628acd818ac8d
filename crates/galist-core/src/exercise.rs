//! Loaded, ready-to-grade exercises.

use serde::{Deserialize, Serialize};

use crate::error::ExerciseError;
use crate::grading;
use crate::model::{ExpectedNode, Submission, Template, ValidationResult, NULL_ADDRESS};
use crate::report::ProgressReport;

/// One template together with its derived expected structure.
///
/// Built in a single step by [`ExerciseInstance::new`] and never mutated.
/// Only templates that pass [`Template::check`] can be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseInstance {
    key: String,
    template: Template,
    expected_structure: Vec<ExpectedNode>,
}

impl ExerciseInstance {
    pub fn new(template: &Template) -> Result<Self, ExerciseError> {
        template
            .check()
            .map_err(|reason| ExerciseError::InvalidTemplate {
                key: template.key.clone(),
                reason,
            })?;

        let expected_structure = derive_expected_structure(template);
        tracing::debug!(
            "derived {} expected nodes for '{}'",
            expected_structure.len(),
            template.key
        );
        Ok(Self {
            key: template.key.clone(),
            template: template.clone(),
            expected_structure,
        })
    }

    /// Key of the template this instance was built from.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn title(&self) -> &str {
        &self.template.title
    }

    pub fn description(&self) -> &str {
        &self.template.description
    }

    pub fn sequence(&self) -> &[i64] {
        &self.template.sequence
    }

    pub fn expected_structure(&self) -> &[ExpectedNode] {
        &self.expected_structure
    }

    /// Grade a submission against the expected structure.
    pub fn validate(&self, submission: &Submission, entry_order: Option<&[String]>) -> ValidationResult {
        grading::grade(self, submission, entry_order)
    }

    /// Count what the learner has built so far.
    pub fn progress_report(&self, submission: &Submission) -> ProgressReport {
        ProgressReport::build(self, submission)
    }
}

/// Derive one expected node per sequence entry, linking each to its
/// neighbours and to the null sentinel at the ends.
fn derive_expected_structure(template: &Template) -> Vec<ExpectedNode> {
    let address_at = |index: Option<usize>| -> String {
        index
            .and_then(|i| template.sequence.get(i))
            .and_then(|value| template.address_of(*value))
            .unwrap_or(NULL_ADDRESS)
            .to_string()
    };

    template
        .sequence
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let next_address = address_at(i.checked_add(1));
            ExpectedNode {
                value: *value,
                address: address_at(Some(i)),
                prev_address: address_at(i.checked_sub(1)),
                next: next_address.clone(),
                next_address,
            }
        })
        .collect()
}
