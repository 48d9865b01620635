use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::brewery::Brewery;
use crate::client::BreweryClient;
use crate::config::ClientConfig;
use crate::coordinate::Coordinate;
use crate::error::BreweryError;
use crate::export::{export_breweries, ExportFormat};
use crate::query::SearchQuery;

/// A simple CLI that retrieves breweries from the Open Brewery DB and
/// displays their name, location and a link to their website.
#[derive(Debug, Parser)]
#[command(name = "brewcli", author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the breweries endpoint (also read from BREWCLI_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Retrieve a random set of breweries
    Random {
        /// Number of breweries to retrieve
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,

        /// Save the results to a .json or .csv file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Retrieve a brewery by ID
    ById {
        /// Brewery ID
        id: String,

        /// Save the result to a .json or .csv file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Retrieve a set of breweries using one or more search terms
    Search(SearchArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub by_city: Option<String>,

    #[arg(long)]
    pub by_country: Option<String>,

    /// Sort by distance from "<latitude>,<longitude>"
    #[arg(long)]
    pub by_dist: Option<String>,

    #[arg(long)]
    pub by_name: Option<String>,

    #[arg(long)]
    pub by_state: Option<String>,

    #[arg(long)]
    pub by_postal: Option<String>,

    /// micro, nano, regional, brewpub, planning, contract, proprietor or closed
    #[arg(long)]
    pub by_type: Option<String>,

    /// Comma-separated brewery IDs
    #[arg(long, value_delimiter = ',')]
    pub by_ids: Vec<String>,

    /// asc or desc
    #[arg(long)]
    pub sort_order: Option<String>,

    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<String>,

    /// Results per page, 1 to 200
    #[arg(long)]
    pub per_page: Option<String>,

    /// Save the results to a .json or .csv file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

impl SearchArgs {
    /// Converts the raw options into a validated [`SearchQuery`].
    pub fn to_query(&self) -> Result<SearchQuery, BreweryError> {
        let mut builder = SearchQuery::builder();

        if let Some(city) = &self.by_city {
            builder = builder.city(city);
        }
        if let Some(country) = &self.by_country {
            builder = builder.country(country);
        }
        if let Some(dist) = &self.by_dist {
            let coord = dist
                .parse::<Coordinate>()
                .map_err(|e: BreweryError| BreweryError::invalid("by_dist", e.to_string()))?;
            builder = builder.coord(coord);
        }
        if let Some(name) = &self.by_name {
            builder = builder.name(name);
        }
        if let Some(state) = &self.by_state {
            builder = builder.state(state);
        }
        if let Some(postal) = &self.by_postal {
            builder = builder.postal(postal);
        }
        if let Some(brewery_type) = &self.by_type {
            builder = builder.brewery_type(brewery_type);
        }
        if !self.by_ids.is_empty() {
            builder = builder.ids(self.by_ids.iter().map(|id| id.trim()));
        }
        if let Some(sort_order) = &self.sort_order {
            builder = builder.sort_order(sort_order);
        }
        if let Some(page) = &self.page {
            builder = builder.page(numeric_arg(page));
        }
        if let Some(per_page) = &self.per_page {
            builder = builder.per_page(numeric_arg(per_page));
        }

        builder.build()
    }
}

// Whole numbers become JSON integers; anything else is passed through as a
// string so query validation reports it.
fn numeric_arg(raw: &str) -> Value {
    raw.trim()
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Installs the global logger. `RUST_LOG` takes precedence over `verbose`.
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Builds a client for this invocation and runs the requested command,
/// writing results to stdout.
pub async fn run(cli: &Cli) -> Result<(), BreweryError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    let client = BreweryClient::new(&config)?;

    let mut stdout = std::io::stdout();
    execute(&cli.command, &client, &mut stdout).await
}

/// Runs one command against `client`, writing human-readable output to `out`.
pub async fn execute<W: Write>(
    command: &Commands,
    client: &BreweryClient,
    out: &mut W,
) -> Result<(), BreweryError> {
    match command {
        Commands::Random { count, save } => {
            check_save_path(save.as_deref())?;
            let breweries = client.random_breweries(*count).await?;
            print_breweries(&breweries, out)?;
            save_breweries(&breweries, save.as_deref(), out)
        }
        Commands::ById { id, save } => {
            check_save_path(save.as_deref())?;
            let brewery = client.brewery_by_id(id).await?;
            let breweries = [brewery];
            print_breweries(&breweries, out)?;
            save_breweries(&breweries, save.as_deref(), out)
        }
        Commands::Search(args) => {
            check_save_path(args.save.as_deref())?;
            let query = args.to_query()?;
            let breweries = client.search_breweries(&query).await?;
            if breweries.is_empty() {
                writeln!(out, "No breweries found.")?;
            } else {
                print_breweries(&breweries, out)?;
            }
            save_breweries(&breweries, args.save.as_deref(), out)
        }
    }
}

// Rejects an unsupported --save extension before any request is made.
fn check_save_path(save: Option<&Path>) -> Result<(), BreweryError> {
    if let Some(path) = save {
        ExportFormat::from_path(path)?;
    }
    Ok(())
}

fn print_breweries<W: Write>(breweries: &[Brewery], out: &mut W) -> Result<(), BreweryError> {
    for brewery in breweries {
        writeln!(out, "{}", brewery)?;
        writeln!(out)?;
    }
    Ok(())
}

fn save_breweries<W: Write>(
    breweries: &[Brewery],
    save: Option<&Path>,
    out: &mut W,
) -> Result<(), BreweryError> {
    if let Some(path) = save {
        let written = export_breweries(breweries, path)?;
        writeln!(out, "Saved {} breweries to {}", written, path.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BreweryType, SortOrder};

    fn search_args(args: &[&str]) -> SearchArgs {
        let mut argv = vec!["brewcli", "search"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Search(search) => search,
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn parses_random_with_save() {
        let cli = Cli::try_parse_from(["brewcli", "random", "3", "--save", "out.csv"]).unwrap();
        match cli.command {
            Commands::Random { count, save } => {
                assert_eq!(count, 3);
                assert_eq!(save, Some(PathBuf::from("out.csv")));
            }
            other => panic!("expected random, got {:?}", other),
        }
    }

    #[test]
    fn random_requires_positive_count() {
        assert!(Cli::try_parse_from(["brewcli", "random", "0"]).is_err());
        assert!(Cli::try_parse_from(["brewcli", "random", "abc"]).is_err());
    }

    #[test]
    fn parses_by_id_and_global_flags() {
        let cli = Cli::try_parse_from([
            "brewcli",
            "by-id",
            "b54b16e1",
            "-v",
            "--base-url",
            "http://localhost:1234",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:1234"));
        assert!(matches!(cli.command, Commands::ById { ref id, .. } if id == "b54b16e1"));
    }

    #[test]
    fn search_args_become_query() {
        let query = search_args(&[
            "--by-city",
            "Grand Rapids",
            "--by-dist",
            "42.96,-85.66",
            "--by-type",
            "micro",
            "--by-ids",
            "123,456",
            "--sort-order",
            "desc",
            "--page",
            "2",
            "--per-page",
            "10",
        ])
        .to_query()
        .unwrap();

        assert_eq!(query.city(), Some("Grand Rapids"));
        assert_eq!(query.coord(), Some(Coordinate::new(42.96, -85.66).unwrap()));
        assert_eq!(query.brewery_type(), Some(BreweryType::Micro));
        assert_eq!(query.ids(), Some(&["123".to_string(), "456".to_string()][..]));
        assert_eq!(query.sort_order(), Some(SortOrder::Desc));
        assert_eq!(query.page(), Some(2));
        assert_eq!(query.per_page(), Some(10));
    }

    #[test]
    fn fractional_per_page_is_invalid_value() {
        let err = search_args(&["--per-page", "12.5"]).to_query().unwrap_err();
        assert!(matches!(err, BreweryError::InvalidValue { ref field, .. } if field == "per_page"));
    }

    #[test]
    fn malformed_distance_is_invalid_value() {
        let err = search_args(&["--by-dist", "north"]).to_query().unwrap_err();
        assert!(matches!(err, BreweryError::InvalidValue { ref field, .. } if field == "by_dist"));
    }
}
