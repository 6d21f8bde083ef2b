//! Demonstration CLI for exercising the ESQL pipeline end-to-end.
//!
//! This is glue, not core: it reads a query and a `.tables/` root from the
//! command line, prints the result as a simple aligned table or the
//! formatted error, and carries no query-language logic of its own.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use esql::{EsqlError, ResultRow};

/// Run an ESQL query against an on-disk `.tables/` directory.
#[derive(Parser, Debug)]
#[command(name = "esql", version, about)]
struct Cli {
    /// Root directory containing `.tables/<name>/` subdirectories.
    #[arg(long, default_value = ".tables")]
    tables_dir: PathBuf,

    /// The query text, given inline.
    #[arg(long, conflicts_with = "query_file")]
    query: Option<String>,

    /// Read the query text from a file instead of `--query`.
    #[arg(long = "file", conflicts_with = "query")]
    query_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("tables_dir = {}", cli.tables_dir.display());

    let query = match read_query(&cli) {
        Ok(query) => query,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };

    match esql::run_query(&query, &cli.tables_dir) {
        Ok(rows) => {
            log::info!("query returned {} row(s)", rows.len());
            print_table(&rows);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::warn!("query failed: {err}");
            eprintln!("{}", format_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn read_query(cli: &Cli) -> Result<String, String> {
    if let Some(query) = &cli.query {
        return Ok(query.clone());
    }
    if let Some(path) = &cli.query_file {
        return fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()));
    }
    Err("pass a query with --query or --file".to_string())
}

fn format_error(err: &EsqlError) -> String {
    format!("esql: {err}")
}

fn print_table(rows: &[ResultRow]) {
    let Some(first) = rows.first() else {
        println!("(0 rows)");
        return;
    };
    let headers: Vec<&str> = first.values().iter().map(|(name, _)| name.as_str()).collect();
    println!("{}", headers.join("\t"));
    for row in rows {
        let cells: Vec<String> = row
            .values()
            .iter()
            .map(|(_, value)| match value {
                Some(v) => v.to_string(),
                None => String::new(),
            })
            .collect();
        println!("{}", cells.join("\t"));
    }
}
