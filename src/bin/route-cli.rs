use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use thiserror::Error;

use trie_router::config::{load_config, ConfigError, ServerConfig};
use trie_router::{RouteError, Router};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Route(#[from] RouteError),
}

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect and test route table files offline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a route table and report every problem found
    Check { file: PathBuf },
    /// Resolve a request against a route table
    Lookup {
        file: PathBuf,
        method: String,
        path: String,
    },
    /// List every registered route
    Routes { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { file } => check(&file),
        Commands::Lookup { file, method, path } => load_config(&file)
            .map_err(CliError::from)
            .and_then(|config| lookup(&config, &method, &path)),
        Commands::Routes { file } => load_config(&file)
            .map_err(CliError::from)
            .and_then(|config| routes(&config)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Config(ConfigError::Validation(errors))) => {
            eprintln!("Error: route table is invalid");
            for error in errors {
                eprintln!("  {}", error);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(file: &Path) -> Result<(), CliError> {
    let config = load_config(file)?;
    println!("OK: {} routes", config.routes.len());
    Ok(())
}

/// Route table keyed to each route's index in the file.
fn index_table(config: &ServerConfig) -> Result<Router<usize>, RouteError> {
    let mut table = Router::new();
    table.add_routes(
        config
            .routes
            .iter()
            .enumerate()
            .map(|(index, route)| (route.method.as_str(), route.path.as_str(), index)),
    )?;
    Ok(table)
}

fn lookup(config: &ServerConfig, method: &str, path: &str) -> Result<(), CliError> {
    let table = index_table(config)?;
    let output = match table.find_route(method, path) {
        Some(node) => match node.handler() {
            Some(&index) => json!({
                "found": true,
                "endpoint": true,
                "segment": node.segment(),
                "route": config.routes[index],
            }),
            None => json!({
                "found": true,
                "endpoint": false,
                "segment": node.segment(),
            }),
        },
        None => json!({ "found": false, "endpoint": false }),
    };
    print_json(&output);
    Ok(())
}

fn routes(config: &ServerConfig) -> Result<(), CliError> {
    let output: Vec<_> = index_table(config)?
        .routes()
        .into_iter()
        .map(|(method, path)| json!({ "method": method, "path": path }))
        .collect();
    print_json(&json!(output));
    Ok(())
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}
