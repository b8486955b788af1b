//! Car Price Lens - Exploratory analysis dashboard for automobile prices
//!
//! Loads the cleaned automobile dataset once and presents five analysis
//! sections: data preview, feature patterns, descriptive statistics,
//! grouping and price correlations.

mod charts;
mod config;
mod data;
mod gui;
mod page;
mod stats;
mod views;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use config::AppConfig;
use data::DataLoader;
use eframe::egui;
use gui::DashboardApp;
use page::Page;
use std::path::PathBuf;
use views::Section;

#[derive(Parser)]
#[command(name = "car-price-lens")]
#[command(about = "Exploratory data analysis of automobile prices")]
#[command(version)]
struct Cli {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Dataset URL or CSV path, overriding the configured source
    #[arg(long)]
    source: Option<String>,
    /// Print one section as text instead of opening the window
    #[arg(long, value_enum)]
    print: Option<Section>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(source) = cli.source {
        config.data_source = source;
    }

    match cli.print {
        Some(section) => print_section(&config, section),
        None => run_dashboard(config),
    }
}

/// Headless rendering of a single section to stdout
fn print_section(config: &AppConfig, section: Section) -> Result<()> {
    let mut loader = DataLoader::new(config.source());
    let table = loader
        .load()
        .with_context(|| format!("loading {}", config.data_source))?;

    let mut page = Page::new();
    section
        .render(table, &mut page)
        .with_context(|| format!("rendering section '{section}'"))?;
    print!("{page}");
    Ok(())
}

fn run_dashboard(config: AppConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Car Price Analysis"),
        ..Default::default()
    };

    eframe::run_native(
        "Car Price Analysis",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
