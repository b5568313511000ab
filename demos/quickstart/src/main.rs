//! quickstart — smallest end-to-end example for the road-map query engine.
//!
//! Builds a synthetic 16-intersection street grid around downtown
//! Berkeley, then answers one query of the chosen kind and prints the
//! response as JSON on stdout.  Logs go to stderr; set `RUST_LOG=debug` to
//! see the search and tiling decisions.
//!
//! ```text
//! quickstart route --from-lon -122.27 --from-lat 37.86 --to-lon -122.258 --to-lat 37.875
//! quickstart raster --width 1024
//! quickstart complete pe
//! quickstart locate "peet's coffee"
//! ```

mod network;


use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rm_service::{GeoPoint, MapConfig, MapService, MapServiceBuilder, RasterRequest, RouteRequest};

#[derive(Parser, Debug)]
#[command(author, version, about = "Road-map query engine quickstart")]
struct Cli {
    /// JSON file overriding the default map configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shortest route between two coordinates, with directions.  The
    /// default runs north on Shattuck Avenue and right onto Allston Way.
    Route {
        #[arg(long, default_value_t = -122.2700, allow_negative_numbers = true)]
        from_lon: f64,
        #[arg(long, default_value_t = 37.8600)]
        from_lat: f64,
        #[arg(long, default_value_t = -122.2580, allow_negative_numbers = true)]
        to_lon: f64,
        #[arg(long, default_value_t = 37.8750)]
        to_lat: f64,
    },
    /// Tiles covering the configured root box at a viewport width.
    Raster {
        #[arg(long, default_value_t = 512.0)]
        width: f64,
        #[arg(long, default_value_t = 512.0)]
        height: f64,
    },
    /// Place names starting with a prefix.
    Complete { prefix: String },
    /// Location records for a full place name.
    Locate { name: String },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let service = build_service(config)?;

    let response = match cli.command {
        Command::Route { from_lon, from_lat, to_lon, to_lat } => {
            let req = RouteRequest::new(GeoPoint::new(from_lon, from_lat), GeoPoint::new(to_lon, to_lat));
            let route = service.route(&req).context("routing failed")?;
            let directions = service.directions_text(&route)?;
            json!({ "route": route, "directions": directions })
        }
        Command::Raster { width, height } => {
            let req = RasterRequest::new(service.config().root, width, height);
            serde_json::to_value(service.raster(&req))?
        }
        Command::Complete { prefix } => {
            let mut names = service.autocomplete(Some(prefix.as_str()))?;
            names.sort_unstable();
            json!(names)
        }
        Command::Locate { name } => serde_json::to_value(service.locations(Some(name.as_str()))?)?,
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<MapConfig> {
    let Some(path) = path else {
        return Ok(MapConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

fn build_service(config: MapConfig) -> Result<MapService> {
    let mut b = MapServiceBuilder::new(config);
    network::populate(&mut b)?;
    let service = b.build().context("invalid map configuration")?;
    info!(
        nodes = service.graph().node_count(),
        edges = service.graph().edge_count(),
        names = service.prefix_index().len(),
        "map service ready"
    );
    Ok(service)
}
