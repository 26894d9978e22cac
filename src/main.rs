//! Plan a heavy-vehicle route and map the stops along it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use truckstop_planner::config::{PlannerConfig, ServiceConfig};
use truckstop_planner::models::{AvoidFeature, Category};
use truckstop_planner::nominatim::NominatimClient;
use truckstop_planner::ors::OrsClient;
use truckstop_planner::overpass::OverpassClient;
use truckstop_planner::planner::{Planner, Waypoint};
use truckstop_planner::proximity::ProximityOptions;
use truckstop_planner::render::LeafletRenderer;

/// Find stops within reach of a heavy-vehicle route
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Origin, a place name or "lon,lat"
    #[arg(long, default_value = "-38.5267,-3.7172")]
    from: Waypoint,

    /// Destination, a place name or "lon,lat"
    #[arg(long, default_value = "Parauapebas, Pará, Brasil")]
    to: Waypoint,

    /// Maximum distance from the route in km
    #[arg(long, default_value_t = 5.0)]
    max_distance_km: f64,

    /// Route simplification tolerance in degrees
    #[arg(long, default_value_t = 0.01)]
    tolerance: f64,

    /// Point-of-interest category (fuel, restaurant, cafe, hotel, motel); repeatable
    #[arg(long = "category", default_value = "fuel")]
    categories: Vec<Category>,

    /// Vehicle weight in tonnes
    #[arg(long, default_value_t = 120.0)]
    weight: f64,

    /// Vehicle height in meters
    #[arg(long, default_value_t = 4.3)]
    height: f64,

    /// Vehicle width in meters
    #[arg(long, default_value_t = 5.0)]
    width: f64,

    /// Vehicle length in meters
    #[arg(long, default_value_t = 70.0)]
    length: f64,

    /// Features to avoid (tollways, ferries, unpaved, tunnels)
    #[arg(long = "avoid", value_delimiter = ',', default_value = "tollways,ferries,unpaved,tunnels")]
    avoid: Vec<AvoidFeature>,

    /// Fetch categories one after another instead of concurrently
    #[arg(long)]
    sequential: bool,

    /// Where to write the HTML map
    #[arg(long, default_value = "route_map.html")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("truckstop_planner=info")),
        )
        .init();

    let args = Args::parse();
    let services = ServiceConfig::from_env();
    if services.ors.api_key.is_empty() {
        anyhow::bail!("ORS_API_KEY is not set");
    }

    let mut config = PlannerConfig {
        proximity: ProximityOptions::new(args.max_distance_km, args.tolerance),
        categories: Category::unique(&args.categories),
        parallel_fetch: !args.sequential,
        ..PlannerConfig::default()
    };
    config.vehicle.weight_tonnes = args.weight;
    config.vehicle.height_m = args.height;
    config.vehicle.width_m = args.width;
    config.vehicle.length_m = args.length;
    config.vehicle.avoid_features = args.avoid;

    let planner = Planner::new(
        NominatimClient::new(services.nominatim).context("building geocoder client")?,
        OrsClient::new(services.ors).context("building routing client")?,
        OverpassClient::new(services.overpass).context("building points-of-interest client")?,
        config,
    );

    tracing::info!(from = %args.from, to = %args.to, "planning heavy-vehicle route");
    let report = planner
        .plan(&args.from, &args.to)
        .with_context(|| format!("planning {} -> {}", args.from, args.to))?;

    for failure in &report.stops.failures {
        eprintln!("warning: {} stops unavailable: {}", failure.category, failure.error);
    }
    if !report.stops.skipped.is_empty() {
        eprintln!("warning: {} malformed points skipped", report.stops.skipped.len());
    }
    for summary in &report.stops.summaries {
        println!(
            "{}: {} within {} km ({} fetched)",
            summary.category, summary.accepted, planner.config().proximity.max_distance_km, summary.fetched
        );
    }

    LeafletRenderer::default()
        .render_to_file(&report.route_map(planner.config()), &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("map written to {}", args.output.display());

    Ok(())
}
