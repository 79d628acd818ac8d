//! The `galist generate` command.

use std::path::PathBuf;

use anyhow::Result;

use galist_core::config::load_config_from;
use galist_core::generator::{initial_nodes, ExerciseGenerator};
use galist_core::parser::to_toml_string;

const MIN_STARTERS: usize = 1;
const MAX_STARTERS: usize = 3;

pub fn execute(count: usize, seed: Option<u64>, starters: bool, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut generator = match seed.or(config.generator_seed) {
        Some(seed) => ExerciseGenerator::seeded(seed, config.pool_size),
        None => ExerciseGenerator::new(config.pool_size),
    };

    let templates: Vec<_> = (0..count).map(|_| generator.next_exercise()).collect();
    tracing::info!("generated {} exercise(s)", templates.len());

    print!("{}", to_toml_string(&templates)?);

    if starters {
        for template in &templates {
            let nodes = initial_nodes(template, generator.rng(), MIN_STARTERS, MAX_STARTERS);
            let listed: Vec<String> = nodes
                .iter()
                .map(|c| format!("{} ({})", c.value, c.address))
                .collect();
            println!("# starters for {}: {}", template.key, listed.join(", "));
        }
    }

    Ok(())
}
