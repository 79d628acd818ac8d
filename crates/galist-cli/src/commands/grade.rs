//! The `galist grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use galist_core::report::GradeReport;
use galist_core::{ExerciseManager, Submission};

pub struct GradeArgs {
    pub template: Option<String>,
    pub submission: PathBuf,
    pub entry_order: Option<String>,
    pub stored: bool,
    pub format: String,
    pub output: Option<PathBuf>,
    pub fail_on_incorrect: bool,
    pub templates: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn execute(args: GradeArgs) -> Result<()> {
    let (config, registry) = super::load_registry(args.templates, args.config)?;

    let content = std::fs::read_to_string(&args.submission)
        .with_context(|| format!("failed to read submission: {}", args.submission.display()))?;
    let submission: Submission = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse submission: {}", args.submission.display()))?;

    let entry_order: Option<Vec<String>> = args.entry_order.map(|order| {
        order
            .split(',')
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect()
    });

    let mut manager =
        ExerciseManager::new(registry).with_default_template(config.default_template.clone());
    let key = args.template.unwrap_or(config.default_template);
    if !manager.registry().contains(&key) {
        let available: Vec<&str> = manager.registry().keys().collect();
        anyhow::bail!(
            "exercise template \"{key}\" not found (available: {})",
            available.join(", ")
        );
    }
    manager.load_exercise(&key)?;

    let result = if args.stored {
        manager.submit_answer(&submission.circles, &submission.connections)?;
        manager.validate_stored(entry_order.as_deref())
    } else {
        manager.validate_direct(&submission, entry_order.as_deref())
    };

    let exercise = manager
        .current_exercise()
        .context("no exercise loaded after grading")?;
    let report = GradeReport::new(exercise, &submission, result);

    match args.format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{json}");
        }
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "text" => print_text(&report),
        other => anyhow::bail!("unknown format: {other} (expected text, json or markdown)"),
    }

    if let Some(output) = &args.output {
        report.save_json(output)?;
        eprintln!("Report saved to {}", output.display());
    }

    if args.fail_on_incorrect && !report.result.is_correct {
        std::process::exit(1);
    }

    Ok(())
}

fn print_text(report: &GradeReport) {
    let status = if report.result.is_correct {
        "CORRECT"
    } else {
        "INCORRECT"
    };
    println!("Template: {}", report.template);
    println!(
        "Result:   {status} ({}/{})",
        report.result.score, report.result.total_points
    );
    println!("{}", report.result.message);
    if !report.result.details.is_empty() {
        println!();
        for line in report.result.details.lines() {
            println!("  {line}");
        }
    }
    println!();
    println!(
        "Nodes {}/{}, connections {}/{}, correct values {}, correct addresses {}",
        report.progress.nodes_created,
        report.progress.expected_nodes,
        report.progress.connections_created,
        report.progress.expected_connections,
        report.progress.correct_values,
        report.progress.correct_addresses,
    );
}
