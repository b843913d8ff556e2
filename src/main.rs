use anyhow::Context;
use clap::{Parser, ValueEnum};
use merisql::mld::report;
use merisql::project::Project;
use merisql::sql::{SqlEmitter, SqlOptions};
use merisql::stats::{ModelStatistics, SchemaStatistics};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// SQL DDL script
    Sql,
    /// Plain-text listing of the logical schema
    Mld,
    /// Logical schema as JSON
    Json,
    /// Model and schema counters
    Stats,
}

/// Derive the logical schema and SQL DDL of a MERISE project file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Project file (.json)
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to generate
    #[arg(short, long, value_enum, default_value_t = Format::Sql)]
    format: Format,

    /// Print validation diagnostics to stderr
    #[arg(long)]
    validate: bool,

    /// Fail without output when validation reports anything
    #[arg(long)]
    strict: bool,

    /// Omit the comment header of the SQL script
    #[arg(long)]
    no_header: bool,

    /// Use CREATE TABLE IF NOT EXISTS
    #[arg(long)]
    if_not_exists: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns the process exit code.
fn run(cli: &Cli) -> anyhow::Result<i32> {
    let project = Project::load(&cli.input)?;

    if cli.validate || cli.strict {
        let diagnostics = project.validate();
        for diagnostic in &diagnostics {
            eprintln!("warning: {}", diagnostic);
        }
        if cli.strict && !diagnostics.is_empty() {
            eprintln!("{} problem(s) found, no output written", diagnostics.len());
            return Ok(2);
        }
    }

    let tables = project.transform();
    let output = match cli.format {
        Format::Sql => SqlEmitter::new(SqlOptions {
            header: !cli.no_header,
            if_not_exists: cli.if_not_exists,
        })
        .emit(&tables, &project.overrides),
        Format::Mld => report::render(&tables, &project.overrides),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(&tables)?;
            json.push('\n');
            json
        }
        Format::Stats => {
            let model = ModelStatistics::of(&project.model);
            let schema = SchemaStatistics::of(&tables);
            format!(
                "Entities: {} | Associations: {} | Links: {} | Attributes: {}\n\
                 Tables: {} | Columns: {} | Primary Keys: {} | Foreign Keys: {}\n",
                model.entities,
                model.associations,
                model.links,
                model.attributes,
                schema.tables,
                schema.columns,
                schema.primary_keys,
                schema.foreign_keys
            )
        }
    };

    match &cli.output {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", output),
    }
    Ok(0)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}
