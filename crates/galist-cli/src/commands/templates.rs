//! The `galist templates` and `galist show` commands.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use galist_core::ExerciseInstance;

pub fn list(extra_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let (config, registry) = super::load_registry(extra_dir, config_path)?;

    let mut table = Table::new();
    table.set_header(vec!["Key", "Title", "Nodes", "Sequence"]);
    for template in registry.iter() {
        let key = if template.key == config.default_template {
            format!("{} (default)", template.key)
        } else {
            template.key.clone()
        };
        table.add_row(vec![
            Cell::new(key),
            Cell::new(&template.title),
            Cell::new(template.sequence.len()),
            Cell::new(template.chain()),
        ]);
    }

    println!("{table}");
    println!("{} template(s)", registry.len());
    Ok(())
}

pub fn show(key: String, extra_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let (_, registry) = super::load_registry(extra_dir, config_path)?;
    let exercise = ExerciseInstance::new(registry.get(&key)?)?;

    println!("{}", exercise.title());
    println!("{}", exercise.description());
    println!();

    let mut table = Table::new();
    table.set_header(vec!["Value", "Address", "Prev", "Next"]);
    for node in exercise.expected_structure() {
        table.add_row(vec![
            Cell::new(node.value),
            Cell::new(&node.address),
            Cell::new(&node.prev_address),
            Cell::new(&node.next_address),
        ]);
    }
    println!("{table}");

    Ok(())
}
