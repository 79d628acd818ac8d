//! galist CLI: grade linked-list exercises from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "galist", version, about = "Linked-list exercise grader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available exercise templates
    Templates {
        /// Extra directory of .toml templates
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the expected structure of a template
    Show {
        /// Template key (e.g. "exercise_one")
        #[arg(long)]
        template: String,

        /// Extra directory of .toml templates
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a submission JSON file against a template
    Grade {
        /// Template key (defaults to the configured default template)
        #[arg(long)]
        template: Option<String>,

        /// Submission JSON file with "circles" and "connections"
        #[arg(long)]
        submission: PathBuf,

        /// Circle ids in portal entry order (comma-separated)
        #[arg(long)]
        entry_order: Option<String>,

        /// Submit first, then grade the stored copy
        #[arg(long)]
        stored: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Also write the JSON report to this path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit code 1 if the submission is not correct
        #[arg(long)]
        fail_on_incorrect: bool,

        /// Extra directory of .toml templates
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate template TOML files
    Validate {
        /// Path to template file or directory
        #[arg(long)]
        templates: PathBuf,
    },

    /// Generate random exercises as TOML
    Generate {
        /// Number of exercises to print
        #[arg(long, default_value = "1")]
        count: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Also print starter nodes for each exercise
        #[arg(long)]
        starters: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config, template and submission files
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("galist=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Templates { templates, config } => commands::templates::list(templates, config),
        Commands::Show {
            template,
            templates,
            config,
        } => commands::templates::show(template, templates, config),
        Commands::Grade {
            template,
            submission,
            entry_order,
            stored,
            format,
            output,
            fail_on_incorrect,
            templates,
            config,
        } => commands::grade::execute(commands::grade::GradeArgs {
            template,
            submission,
            entry_order,
            stored,
            format,
            output,
            fail_on_incorrect,
            templates,
            config,
        }),
        Commands::Validate { templates } => commands::validate::execute(templates),
        Commands::Generate {
            count,
            seed,
            starters,
            config,
        } => commands::generate::execute(count, seed, starters, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
