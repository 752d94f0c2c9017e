mod app;
mod cli;
mod color;
mod data;
mod export;
mod state;
mod ui;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;

use app::ExplorerApp;
use cli::Cli;
use data::columns::{CandidateLists, ResolvedColumns};
use data::histogram::{DEFAULT_BINS, Histogram};
use data::view::{Selection, compute_view};
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dataset = data::loader::load_file(&cli.data)?;
    let candidates = CandidateLists::default();
    let columns = ResolvedColumns::resolve(&dataset, &candidates)
        .context("Could not detect country/year columns")?;
    let selection = Selection::from_inputs(
        &columns,
        cli.metric.as_deref(),
        cli.year.as_deref(),
        cli.transform.as_deref(),
    );

    if let Some(path) = &cli.export {
        let view = compute_view(&dataset, &columns, &selection);
        let histogram = Histogram::from_values(&view.distribution, DEFAULT_BINS);
        return export::write_json(path, &view, &histogram);
    }

    let state = AppState::new(cli.data, dataset, columns, candidates, selection);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CO₂ Emissions Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(ExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the UI: {e}"))
}
