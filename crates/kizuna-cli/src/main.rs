use anyhow::{Context, Result};
use clap::Parser;
use kizuna_etl::{config, Config};
use kizuna_graph::Traversal;
use std::path::PathBuf;

mod commands;
mod tui;

#[derive(Debug, Parser)]
#[command(name = "kizuna", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the CSV dataset (default: anime.csv)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Minimum similarity for two titles to be linked, between 0 and 1
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(flatten)]
    Dataset(DatasetCommand),
}

/// Commands that read the dataset, run after configuration is loaded.
#[derive(Debug, clap::Subcommand)]
enum DatasetCommand {
    /// Find titles by name prefix, ignoring case
    Search {
        prefix: String,
        /// Maximum number of results (default: suggestion_limit from config)
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Show one title's record
    Show {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// List every category with its title count
    Categories,
    /// Narrow the catalog by one or more categories
    ///
    /// Each category further restricts the results to titles that carry all
    /// of the categories given so far. Results are ranked by rating.
    Browse {
        #[arg(required = true)]
        categories: Vec<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Summarize the loaded catalog and its similarity graph
    Stats,
    /// List the titles linked to NAME, closest first
    Neighbors { name: String },
    /// Visit every title reachable from NAME
    Traverse {
        name: String,
        #[arg(long, value_enum, default_value_t = Mode::Bfs)]
        mode: Mode,
    },
    /// Find a chain of similar titles from FROM to TO
    ///
    /// Breadth-first search returns a path with the fewest hops; depth-first
    /// search returns whichever path it reaches first.
    Path {
        from: String,
        to: String,
        #[arg(long, value_enum, default_value_t = Mode::Bfs)]
        mode: Mode,
        #[arg(long)]
        json: bool,
    },
    /// Score two titles against each other
    Similarity { a: String, b: String },
    /// Write the similarity graph in Graphviz format
    ExportDot {
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Browse the catalog interactively
    Tui,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Mode {
    Bfs,
    Dfs,
}

impl From<Mode> for Traversal {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Bfs => Self::BreadthFirst,
            Mode::Dfs => Self::DepthFirst,
        }
    }
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
    /// Print one value, or the whole file when no key is given
    Get { key: Option<String> },
    /// Set a value in the config file, e.g. `weights.rating 0.2`
    Set { key: String, value: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::config_file_path);

    let command = match cli.command {
        Commands::Config { action } => return run_config(action, &config_path),
        Commands::Dataset(command) => command,
    };

    let mut config = Config::load_from(&config_path)?;
    if let Some(data) = cli.data {
        config.dataset_path = data;
    }
    if let Some(threshold) = cli.threshold {
        config.similarity_threshold = threshold;
    }
    config
        .validate()
        .context("Invalid command-line overrides")?;

    if let Err(e) = twyg::setup(config.logging.clone()) {
        eprintln!("Failed to set up logging: {e:?}");
    }
    log::debug!("using configuration from {}", config_path.display());

    match command {
        DatasetCommand::Search {
            prefix,
            limit,
            json,
        } => commands::catalog::search(&config, &prefix, limit, json),
        DatasetCommand::Show { name, json } => commands::catalog::show(&config, &name, json),
        DatasetCommand::Categories => commands::catalog::categories(&config),
        DatasetCommand::Browse { categories, limit } => {
            commands::browse::browse(&config, &categories, limit)
        }
        DatasetCommand::Stats => commands::catalog::stats(&config),
        DatasetCommand::Neighbors { name } => commands::graph::neighbors(&config, &name),
        DatasetCommand::Traverse { name, mode } => {
            commands::graph::traverse(&config, &name, mode.into())
        }
        DatasetCommand::Path {
            from,
            to,
            mode,
            json,
        } => commands::graph::path(&config, &from, &to, mode.into(), json),
        DatasetCommand::Similarity { a, b } => commands::graph::similarity(&config, &a, &b),
        DatasetCommand::ExportDot { output } => commands::graph::export_dot(&config, output),
        DatasetCommand::Tui => tui::run_tui(&config),
    }
}

fn run_config(action: ConfigAction, config_path: &std::path::Path) -> Result<()> {
    match action {
        ConfigAction::Show => commands::config::show_config(config_path),
        ConfigAction::Path => commands::config::show_path(config_path),
        ConfigAction::Example => commands::config::show_example(),
        ConfigAction::Init => commands::config::init_config(config_path),
        ConfigAction::Get { key } => commands::config::get_config(config_path, key),
        ConfigAction::Set { key, value } => commands::config::set_config(config_path, &key, &value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_parses_apart_from_dataset_commands() {
        let cli = Cli::try_parse_from(["kizuna", "config", "get", "weights.rating"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Get { key: Some(_) }
            }
        ));

        let cli = Cli::try_parse_from(["kizuna", "--threshold", "0.8", "path", "A", "B", "--mode", "dfs"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Dataset(DatasetCommand::Path {
                mode: Mode::Dfs,
                json: false,
                ..
            })
        ));
        assert_eq!(cli.threshold, Some(0.8));
    }
}
