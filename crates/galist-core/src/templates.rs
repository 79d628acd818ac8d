//! Template registry.
//!
//! Holds the named exercise templates a manager can load. The built-in set
//! ships with the crate; more can be registered from TOML template files.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::error::ExerciseError;
use crate::model::Template;
use crate::parser;

/// Key of the template loaded when grading starts without an exercise.
pub const DEFAULT_TEMPLATE: &str = "exercise_one";

/// Named set of exercise templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
}

impl TemplateRegistry {
    /// A registry with no templates.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the built-in exercises.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for template in builtin_templates() {
            registry.templates.insert(template.key.clone(), template);
        }
        registry
    }

    /// Add a template, replacing any template with the same key.
    ///
    /// Returns the replaced template, if there was one.
    pub fn register(&mut self, template: Template) -> Result<Option<Template>, ExerciseError> {
        template
            .check()
            .map_err(|reason| ExerciseError::InvalidTemplate {
                key: template.key.clone(),
                reason,
            })?;

        let replaced = self.templates.insert(template.key.clone(), template);
        if let Some(old) = &replaced {
            tracing::debug!("template '{}' replaced", old.key);
        }
        Ok(replaced)
    }

    /// Register every template found under the given directories.
    ///
    /// Invalid templates are skipped with a warning. Returns how many were
    /// registered.
    pub fn load_directories(&mut self, dirs: &[PathBuf]) -> Result<usize> {
        let mut loaded = 0;
        for dir in dirs {
            for template in parser::load_template_directory(dir)? {
                let key = template.key.clone();
                match self.register(template) {
                    Ok(_) => loaded += 1,
                    Err(e) => tracing::warn!("skipping template '{key}' from {}: {e}", dir.display()),
                }
            }
        }
        Ok(loaded)
    }

    pub fn get(&self, key: &str) -> Result<&Template, ExerciseError> {
        self.templates
            .get(key)
            .ok_or_else(|| ExerciseError::TemplateNotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn builtin_templates() -> Vec<Template> {
    vec![
        Template::from_pairs(
            "exercise_one",
            "Create this Linked List",
            "Create a linked list with the following values: 5 -> 10 -> 15 -> 20 -> 25",
            &[(5, "aa"), (10, "bb"), (15, "cc"), (20, "dd"), (25, "ee")],
        ),
        Template::from_pairs(
            "exercise_two",
            "Create this Linked List",
            "Create a linked list with the following values: 12 -> 8 -> 3 -> 25 -> 14 -> 7",
            &[
                (12, "f10"),
                (8, "g20"),
                (3, "h30"),
                (25, "i40"),
                (14, "j50"),
                (7, "k60"),
            ],
        ),
        Template::from_pairs(
            "exercise_three",
            "Create this Linked List",
            "Create a linked list with the following values: 30 -> 28 -> 26 -> 32 -> 40 -> 42 -> 44",
            &[
                (30, "s101"),
                (28, "t103"),
                (26, "u105"),
                (32, "v107"),
                (40, "w109"),
                (42, "x111"),
                (44, "y113"),
            ],
        ),
    ]
}
