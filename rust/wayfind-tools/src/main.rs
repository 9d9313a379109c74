use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use wayfind_core::Algorithm;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "wayfind-tools", version, about = "Offline diagnostics for wayfind grids and accessibility features")]
struct Cli {
    /// Grid artifact (JSON)
    #[arg(long = "grid", value_name = "PATH", default_value = "static/grid.json", global = true)]
    grid: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct FeatureArgs {
    /// SQLite database with a `nodes` table
    #[arg(long = "features-db", value_name = "PATH")]
    pub features_db: Option<PathBuf>,

    /// GeoJSON FeatureCollection of nodes
    #[arg(long = "features-geojson", value_name = "PATH", conflicts_with = "features_db")]
    pub features_geojson: Option<PathBuf>,

    /// Buffer radius around ramps and stairs, in cells
    #[arg(long = "buffer", value_name = "CELLS", default_value_t = wayfind_core::accessibility::DEFAULT_BUFFER_SIZE)]
    pub buffer: i32,
}

#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// Start pixel as `x,y`
    #[arg(long = "start", value_name = "X,Y", value_parser = parse_pixel)]
    pub start: (i64, i64),

    /// End pixel as `x,y`
    #[arg(long = "end", value_name = "X,Y", value_parser = parse_pixel)]
    pub end: (i64, i64),

    /// Avoid stairs and prefer ramps
    #[arg(long = "accessible", default_value_t = false)]
    pub accessible: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the grid artifact and report walkable regions
    CheckGrid,
    /// Classify features and report ramp/stair coverage
    Classify {
        #[command(flatten)]
        features: FeatureArgs,
    },
    /// Plan one route exactly as the service would
    Route {
        #[command(flatten)]
        endpoints: EndpointArgs,
        #[command(flatten)]
        features: FeatureArgs,
        #[arg(long = "algorithm", value_name = "NAME", value_parser = parse_algorithm, default_value = "astar")]
        algorithm: Algorithm,
    },
    /// Run Dijkstra and A* on the same request and compare their work
    Compare {
        #[command(flatten)]
        endpoints: EndpointArgs,
        #[command(flatten)]
        features: FeatureArgs,
    },
    /// Load a GeoJSON node export into a SQLite `nodes` table
    Import {
        #[arg(long = "geojson", value_name = "PATH")]
        geojson: PathBuf,
        #[arg(long = "out-db", value_name = "PATH")]
        out_db: PathBuf,
        /// Drop existing rows first
        #[arg(long = "replace", default_value_t = false)]
        replace: bool,
    },
}

fn parse_pixel(s: &str) -> std::result::Result<(i64, i64), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got {:?}", s))?;
    let x = x.trim().parse::<i64>().map_err(|e| format!("bad x in {:?}: {}", s, e))?;
    let y = y.trim().parse::<i64>().map_err(|e| format!("bad y in {:?}: {}", s, e))?;
    Ok((x, y))
}

fn parse_algorithm(s: &str) -> std::result::Result<Algorithm, String> {
    Algorithm::parse(s).ok_or_else(|| format!("unknown algorithm {:?} (expected astar or dijkstra)", s))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the JSON report.
    let subscriber = FmtSubscriber::builder().with_ansi(false).with_writer(std::io::stderr).json().finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let cli = Cli::parse();
    info!(?cli, "starting wayfind-tools");

    match cli.command {
        Command::CheckGrid => {
            let grid = commands::load_grid(&cli.grid)?;
            print_json(&commands::check_grid::run(&grid))
        }
        Command::Classify { features } => {
            let grid = commands::load_grid(&cli.grid)?;
            print_json(&commands::classify::run(&grid, &features)?)
        }
        Command::Route { endpoints, features, algorithm } => {
            let grid = commands::load_grid(&cli.grid)?;
            print_json(&commands::route::run(&grid, &features, &endpoints, algorithm)?)
        }
        Command::Compare { endpoints, features } => {
            let grid = commands::load_grid(&cli.grid)?;
            print_json(&commands::compare::run(&grid, &features, &endpoints)?)
        }
        Command::Import { geojson, out_db, replace } => {
            print_json(&commands::import::run(&geojson, &out_db, replace)?)
        }
    }
}
