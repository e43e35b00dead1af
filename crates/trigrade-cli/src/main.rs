//! trigrade CLI: quiz generation, grading, rubric scoring and analytics for
//! the triangle unit.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "trigrade",
    version,
    about = "Triangle-unit quiz generation, auto-grading and rubric scoring"
)]
struct Cli {
    /// Session snapshot file (default from config: trigrade-session.json)
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and sample roster
    Init,

    /// Generate a new quiz, replacing the active one
    Generate {
        /// Random seed (same seed, same quiz)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of items (5-20)
        #[arg(long)]
        count: Option<usize>,

        /// Topics to draw from, comma-separated (e.g. "congruence,similarity_basic")
        #[arg(long)]
        topics: Option<String>,

        /// Include numeric-entry and true/false items
        #[arg(long)]
        varied: bool,
    },

    /// Show the active quiz
    Quiz {
        /// Also print the canonical answers
        #[arg(long)]
        answers: bool,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show the roster, or replace it from a CSV file
    Roster {
        /// Roster CSV to import (columns ID/학번 and 이름/name)
        #[arg(long)]
        import: Option<PathBuf>,
    },

    /// Record a student's answers as ITEM=VALUE pairs
    Answer {
        /// Student id or name
        #[arg(long)]
        student: String,

        /// Answers, e.g. AS-40-60=80
        #[arg(required = true)]
        responses: Vec<String>,
    },

    /// Auto-grade submitted answers against the active quiz
    Grade {
        /// Student id or name (default: every student on the roster)
        #[arg(long)]
        student: Option<String>,
    },

    /// Performance task rubric scoring
    Rubric {
        #[command(subcommand)]
        action: RubricAction,
    },

    /// Show mastery, rubric and item analytics
    Analytics {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Export records and reports
    Export {
        /// Output directory (default from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: csv, json, html, all
        #[arg(long, default_value = "csv")]
        format: String,

        /// Omit the UTF-8 byte-order mark from CSV files
        #[arg(long)]
        no_bom: bool,
    },
}

#[derive(Subcommand)]
pub enum RubricAction {
    /// Save levels (1-4) for one student and task
    Save {
        /// Student id or name
        #[arg(long)]
        student: String,

        /// Task id (PT-1, PT-2, PT-3)
        #[arg(long)]
        task: String,

        #[arg(long, default_value = "3")]
        concept: u8,

        #[arg(long, default_value = "3")]
        procedure: u8,

        #[arg(long, default_value = "3")]
        reasoning: u8,

        #[arg(long, default_value = "3")]
        communication: u8,

        /// Evidence notes
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Show the saved score sheet for one student and task
    Show {
        #[arg(long)]
        student: String,

        #[arg(long)]
        task: String,
    },

    /// List the performance tasks
    Tasks,

    /// Show the rubric criteria and level descriptors
    Levels,
}

fn main() {
    let directive = match "trigrade=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: invalid log directive: {e}");
            process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = commands::GlobalOpts {
        session: cli.session,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Generate {
            seed,
            count,
            topics,
            varied,
        } => commands::generate::execute(&opts, seed, count, topics, varied),
        Commands::Quiz { answers, format } => commands::quiz::execute(&opts, answers, format),
        Commands::Roster { import } => commands::roster::execute(&opts, import),
        Commands::Answer { student, responses } => {
            commands::answer::execute(&opts, student, responses)
        }
        Commands::Grade { student } => commands::grade::execute(&opts, student),
        Commands::Rubric { action } => commands::rubric::execute(&opts, action),
        Commands::Analytics { format } => commands::analytics::execute(&opts, format),
        Commands::Export {
            output,
            format,
            no_bom,
        } => commands::export::execute(&opts, output, format, no_bom),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
