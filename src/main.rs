extern crate log;
pub mod config;
pub mod geofile;
pub mod map;
pub mod neighborhoods;
pub mod view;
use crate::config::{load_config, Config};
use crate::geofile::geojson::write_feature_collection_to_geojson;
use crate::view::page::Page;
use clap::Parser;
use indicatif::ProgressBar;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Render neighborhood livability scores as a choropleth map page.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an optional YAML config file.
    #[arg(short, long)]
    config_filepath: Option<PathBuf>,

    /// Base URL of the neighborhoods API, e.g. http://localhost:8000.
    #[arg(short, long)]
    api_base_url: Option<String>,

    /// Where to write the HTML page.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn resolve_config(args: Args) -> anyhow::Result<Config> {
    let mut config = match &args.config_filepath {
        Some(config_filepath) => load_config(config_filepath)?,
        None => Config::default(),
    };
    if let Some(api_base_url) = args.api_base_url {
        config.api_base_url = api_base_url;
    }
    if let Some(output) = args.output {
        config.output_path = output;
    }
    Ok(config)
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    let config = resolve_config(args)?;
    log::debug!("{:?}", config);

    let mut page = Page::open(&config)?;
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Loading neighborhoods from {}", config.api_base_url));
    page.run_until_settled(Duration::from_millis(100), || spinner.tick())?;
    spinner.finish_and_clear();

    match (page.collection(), page.load_error()) {
        (Some(collection), _) => {
            log::info!("Loaded {} neighborhoods", collection.features.len());
            if let Some(geojson_dump_path) = &config.geojson_dump_path {
                log::info!(
                    "Writing neighborhoods to GeoJSON to {:?}",
                    geojson_dump_path
                );
                write_feature_collection_to_geojson(collection, geojson_dump_path)?;
            }
        }
        (None, Some(reason)) => {
            log::warn!("Rendering base map without neighborhoods: {}", reason)
        }
        (None, None) => {}
    }

    log::info!("Writing map page to {:?}", &config.output_path);
    fs::write(&config.output_path, page.to_html()?)?;
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
