//! TOML template parser.
//!
//! Loads exercise templates from TOML files and directories, lints them,
//! and writes them back out.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Template;

/// Intermediate TOML structure for template files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlTemplateFile {
    #[serde(default)]
    templates: Vec<TomlTemplate>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlTemplate {
    key: String,
    #[serde(default = "default_title")]
    title: String,
    #[serde(default)]
    description: String,
    sequence: Vec<i64>,
    /// TOML table keys are always strings; values are parsed on load.
    #[serde(default)]
    addresses: BTreeMap<String, String>,
}

fn default_title() -> String {
    "Create this Linked List".to_string()
}

/// Parse a single TOML file into templates.
pub fn parse_template_file(path: &Path) -> Result<Vec<Template>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read template file: {}", path.display()))?;

    parse_template_str(&content, path)
}

/// Parse a TOML string into templates (useful for testing).
pub fn parse_template_str(content: &str, source_path: &Path) -> Result<Vec<Template>> {
    let parsed: TomlTemplateFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    parsed
        .templates
        .into_iter()
        .map(|t| {
            let addresses = t
                .addresses
                .into_iter()
                .map(|(value, address)| {
                    let value = value.trim().parse::<i64>().with_context(|| {
                        format!("template '{}': address key '{value}' is not a number", t.key)
                    })?;
                    Ok((value, address))
                })
                .collect::<Result<BTreeMap<_, _>>>()?;

            let mut template = Template {
                key: t.key,
                title: t.title,
                description: t.description,
                sequence: t.sequence,
                addresses,
            };
            if template.description.trim().is_empty() {
                template.description = format!(
                    "Create a linked list with the following values: {}",
                    template.chain()
                );
            }
            Ok(template)
        })
        .collect()
}

/// Recursively load all `.toml` template files from a directory.
pub fn load_template_directory(dir: &Path) -> Result<Vec<Template>> {
    let mut templates = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            templates.extend(load_template_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_template_file(&path) {
                Ok(parsed) => templates.extend(parsed),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(templates)
}

/// Serialize templates into the TOML file format.
pub fn to_toml_string(templates: &[Template]) -> Result<String> {
    let file = TomlTemplateFile {
        templates: templates
            .iter()
            .map(|t| TomlTemplate {
                key: t.key.clone(),
                title: t.title.clone(),
                description: t.description.clone(),
                sequence: t.sequence.clone(),
                addresses: t
                    .addresses
                    .iter()
                    .map(|(value, address)| (value.to_string(), address.clone()))
                    .collect(),
            })
            .collect(),
    };
    toml::to_string(&file).context("failed to serialize templates")
}

/// A warning from template linting.
#[derive(Debug, Clone)]
pub struct TemplateWarning {
    /// The template key (if applicable).
    pub template_key: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Lint templates for contract violations and common mistakes.
pub fn validate_templates(templates: &[Template]) -> Vec<TemplateWarning> {
    let mut warnings = Vec::new();
    let warn = |key: &str, message: String| TemplateWarning {
        template_key: Some(key.to_string()),
        message,
    };

    let mut seen_keys = HashSet::new();
    for template in templates {
        if !seen_keys.insert(&template.key) {
            warnings.push(warn(&template.key, format!("duplicate template key: {}", template.key)));
        }
    }

    for template in templates {
        if template.sequence.is_empty() {
            warnings.push(warn(&template.key, "sequence is empty".into()));
            continue;
        }

        let mut seen_values = HashSet::new();
        for value in &template.sequence {
            if !seen_values.insert(value) {
                warnings.push(warn(&template.key, format!("value {value} appears more than once")));
            }
            if !template.addresses.contains_key(value) {
                warnings.push(warn(&template.key, format!("value {value} has no address")));
            }
        }

        let mut owners: HashMap<&str, i64> = HashMap::new();
        for (value, address) in &template.addresses {
            if !template.sequence.contains(value) {
                warnings.push(warn(
                    &template.key,
                    format!("address \"{address}\" is assigned to {value}, which is not in the sequence"),
                ));
            }
            if let Some(first) = owners.insert(address.as_str(), *value) {
                warnings.push(warn(
                    &template.key,
                    format!("address \"{address}\" is shared by {first} and {value}"),
                ));
            }
        }
    }

    warnings
}
