//! The `galist init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("galist.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("templates")?;
    write_if_missing(Path::new("templates/example.toml"), EXAMPLE_TEMPLATES)?;

    std::fs::create_dir_all("submissions")?;
    write_if_missing(Path::new("submissions/example.json"), EXAMPLE_SUBMISSION)?;

    println!("\nNext steps:");
    println!("  1. Run: galist validate --templates templates/example.toml");
    println!("  2. Run: galist show --template countdown");
    println!("  3. Run: galist grade --template exercise_one --submission submissions/example.json");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# galist configuration

default_template = "exercise_one"
template_dirs = ["templates"]
pool_size = 20
# generator_seed = 42
"#;

const EXAMPLE_TEMPLATES: &str = r#"[[templates]]
key = "countdown"
title = "Create this Linked List"
description = "Link the nodes from largest to smallest."
sequence = [9, 7, 5, 3]

[templates.addresses]
9 = "q1"
7 = "q2"
5 = "q3"
3 = "q4"
"#;

const EXAMPLE_SUBMISSION: &str = r#"{
  "circles": [
    { "id": "c1", "value": 5, "address": "aa" },
    { "id": "c2", "value": 10, "address": "bb" },
    { "id": "c3", "value": 15, "address": "cc" },
    { "id": "c4", "value": 20, "address": "dd" },
    { "id": "c5", "value": 25, "address": "ee" }
  ],
  "connections": [
    { "from": "c1", "to": "c2" },
    { "from": "c2", "to": "c3" },
    { "from": "c3", "to": "c4" },
    { "from": "c4", "to": "c5" }
  ]
}
"#;
