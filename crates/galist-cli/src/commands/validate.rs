//! The `galist validate` command.

use std::path::PathBuf;

use anyhow::Result;

use galist_core::parser::{load_template_directory, parse_template_file, validate_templates};

pub fn execute(templates_path: PathBuf) -> Result<()> {
    let templates = if templates_path.is_dir() {
        load_template_directory(&templates_path)?
    } else {
        parse_template_file(&templates_path)?
    };

    println!(
        "Template file: {} ({} templates)",
        templates_path.display(),
        templates.len()
    );

    let warnings = validate_templates(&templates);
    for w in &warnings {
        let prefix = w
            .template_key
            .as_ref()
            .map(|key| format!("  [{key}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All templates valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
