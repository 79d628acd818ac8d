//! galist-core: linked-list exercise templates, grading and lifecycle.
//!
//! This crate defines the exercise data model, the template registry, the
//! grading rules that compare a learner's circles and connections against an
//! expected list, and the manager that drives load/submit/validate.

pub mod config;
pub mod error;
pub mod exercise;
pub mod generator;
pub mod grading;
pub mod manager;
pub mod model;
pub mod parser;
pub mod report;
pub mod templates;

pub use error::ExerciseError;
pub use exercise::ExerciseInstance;
pub use manager::{ExerciseManager, GradingObserver, NoopObserver};
pub use model::{Circle, Connection, Submission, Template, ValidationResult};
