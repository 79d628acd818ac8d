//! Exercise lifecycle orchestrator.
//!
//! The manager owns at most one loaded exercise and one pending submission.
//! Every call runs to completion on the caller's thread; a later load or
//! submit simply replaces what was there.

use crate::error::ExerciseError;
use crate::exercise::ExerciseInstance;
use crate::generator::ExerciseGenerator;
use crate::model::{Circle, Connection, Submission, ValidationResult};
use crate::templates::{TemplateRegistry, DEFAULT_TEMPLATE};

/// Lifecycle callbacks for a hosting UI or log sink.
pub trait GradingObserver {
    fn on_load(&self, exercise: &ExerciseInstance);
    fn on_submit(&self, exercise: &ExerciseInstance, submission: &Submission);
    fn on_graded(&self, exercise: &ExerciseInstance, result: &ValidationResult);
    fn on_soft_failure(&self, result: &ValidationResult);
}

/// No-op observer.
pub struct NoopObserver;

impl GradingObserver for NoopObserver {
    fn on_load(&self, _: &ExerciseInstance) {}
    fn on_submit(&self, _: &ExerciseInstance, _: &Submission) {}
    fn on_graded(&self, _: &ExerciseInstance, _: &ValidationResult) {}
    fn on_soft_failure(&self, _: &ValidationResult) {}
}

/// Loads exercises, holds submissions and grades them.
pub struct ExerciseManager {
    registry: TemplateRegistry,
    default_template: String,
    observer: Box<dyn GradingObserver>,
    current_exercise: Option<ExerciseInstance>,
    submission: Option<Submission>,
    waiting_for_validation: bool,
    completed: u32,
}

impl Default for ExerciseManager {
    fn default() -> Self {
        Self::new(TemplateRegistry::builtin())
    }
}

impl ExerciseManager {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self {
            registry,
            default_template: DEFAULT_TEMPLATE.to_string(),
            observer: Box::new(NoopObserver),
            current_exercise: None,
            submission: None,
            waiting_for_validation: false,
            completed: 0,
        }
    }

    /// Use `key` when grading has to recover from having no exercise.
    pub fn with_default_template(mut self, key: impl Into<String>) -> Self {
        self.default_template = key.into();
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn GradingObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Load the template registered under `key`, replacing the current
    /// exercise and discarding any pending submission.
    pub fn load_exercise(&mut self, key: &str) -> Result<&ExerciseInstance, ExerciseError> {
        let template = self.registry.get(key)?;
        let exercise = ExerciseInstance::new(template)?;
        Ok(self.install(exercise))
    }

    /// Load the next exercise handed out by `generator`.
    pub fn load_generated(
        &mut self,
        generator: &mut ExerciseGenerator,
    ) -> Result<&ExerciseInstance, ExerciseError> {
        let exercise = ExerciseInstance::new(&generator.next_exercise())?;
        Ok(self.install(exercise))
    }

    fn install(&mut self, exercise: ExerciseInstance) -> &ExerciseInstance {
        tracing::info!(
            "loaded exercise '{}' ({} nodes)",
            exercise.key(),
            exercise.expected_structure().len()
        );
        self.observer.on_load(&exercise);
        self.submission = None;
        self.waiting_for_validation = false;
        self.current_exercise.insert(exercise)
    }

    /// Store an independent copy of the learner's answer for later grading.
    pub fn submit_answer(
        &mut self,
        circles: &[Circle],
        connections: &[Connection],
    ) -> Result<(), ExerciseError> {
        let Some(exercise) = &self.current_exercise else {
            return Err(ExerciseError::NoExerciseLoaded);
        };

        let submission = Submission::capture(circles, connections);
        if submission.is_empty() {
            tracing::warn!("empty submission stored for '{}'", exercise.key());
        }
        tracing::debug!(
            "stored submission for '{}': {} circles, {} connections",
            exercise.key(),
            submission.circles.len(),
            submission.connections.len()
        );
        self.observer.on_submit(exercise, &submission);
        self.submission = Some(submission);
        self.waiting_for_validation = true;
        Ok(())
    }

    /// Grade `submission` directly.
    ///
    /// With no exercise loaded, the default template is loaded first. This
    /// never fails: problems come back as a zero-score result.
    pub fn validate_direct(
        &mut self,
        submission: &Submission,
        entry_order: Option<&[String]>,
    ) -> ValidationResult {
        if self.current_exercise.is_none() {
            let fallback = self.default_template.clone();
            tracing::warn!("no exercise loaded, attempting to load '{fallback}'");
            if let Err(e) = self.load_exercise(&fallback).map(|_| ()) {
                tracing::error!("failed to load default exercise: {e}");
                return self.soft_failure("System not ready", "Please try again in a moment.");
            }
        }

        match &self.current_exercise {
            Some(exercise) => {
                let result = exercise.validate(submission, entry_order);
                self.graded(exercise, &result);
                result
            }
            None => self.soft_failure("System not ready", "Please try again in a moment."),
        }
    }

    /// Grade the submission stored by [`submit_answer`](Self::submit_answer).
    ///
    /// The stored submission is consumed. This never fails: problems come
    /// back as a zero-score result.
    pub fn validate_stored(&mut self, entry_order: Option<&[String]>) -> ValidationResult {
        let Some(exercise) = &self.current_exercise else {
            tracing::error!("no exercise loaded for stored validation");
            return self.soft_failure("System not ready", "Please refresh and try again.");
        };

        let Some(submission) = self.submission.take() else {
            tracing::warn!("no stored submission for '{}'", exercise.key());
            return self.soft_failure("No submission found", "Please create your linked list first.");
        };

        let result = exercise.validate(&submission, entry_order);
        self.graded(exercise, &result);
        self.waiting_for_validation = false;
        result
    }

    fn graded(&self, exercise: &ExerciseInstance, result: &ValidationResult) {
        tracing::info!(
            "graded '{}': {} ({}/{})",
            exercise.key(),
            result.message,
            result.score,
            result.total_points
        );
        self.observer.on_graded(exercise, result);
    }

    fn soft_failure(&self, message: &str, details: &str) -> ValidationResult {
        let result = ValidationResult::failure(message, details);
        self.observer.on_soft_failure(&result);
        result
    }

    pub fn current_exercise(&self) -> Option<&ExerciseInstance> {
        self.current_exercise.as_ref()
    }

    /// The stored submission awaiting grading, if any.
    pub fn pending_submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    /// Whether a submission is stored and not yet graded.
    pub fn is_waiting(&self) -> bool {
        self.waiting_for_validation
    }

    /// Drop the stored submission, keeping the current exercise for a retry.
    pub fn reset(&mut self) {
        self.submission = None;
        self.waiting_for_validation = false;
    }

    pub fn mark_completed(&mut self) {
        self.completed += 1;
    }

    pub fn completed_count(&self) -> u32 {
        self.completed
    }

    pub fn reset_completed_count(&mut self) {
        self.completed = 0;
    }
}
