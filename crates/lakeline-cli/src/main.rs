mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lakeline_engine::layout::ProjectLayout;

#[derive(Parser)]
#[command(
    name = "lakeline",
    version,
    about = "SQL-first raw/cleaned/curated pipelines over a snapshot-versioned catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project base directory
    #[arg(long, default_value = ".", global = true)]
    base_dir: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new project with example configs
    Init,
    /// Extract source tables into the raw layer
    Extract {
        /// Extract every configured table
        #[arg(long, conflicts_with = "table")]
        all: bool,
        /// Extract one table by name
        #[arg(long)]
        table: Option<String>,
        /// Extract even if the table is fresh
        #[arg(long)]
        force: bool,
    },
    /// Run a transformation pipeline
    Run {
        /// Pipeline name from config/pipeline.yml
        #[arg(long, conflicts_with = "named")]
        pipeline: Option<String>,
        /// Named pipeline from config/named_pipelines.yml
        #[arg(long)]
        named: Option<String>,
    },
    /// Show catalog contents and table freshness
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    let layout = ProjectLayout::new(&cli.base_dir);
    match cli.command {
        Commands::Init => commands::init::execute(&layout),
        Commands::Extract { all, table, force } => {
            commands::extract::execute(&layout, all, table.as_deref(), force)
        }
        Commands::Run { pipeline, named } => {
            commands::run::execute(&layout, pipeline.as_deref(), named.as_deref())
        }
        Commands::Status => commands::status::execute(&layout),
    }
}
