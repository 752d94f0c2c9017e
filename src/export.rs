use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::histogram::{Bin, Histogram};
use crate::data::view::{Transform, View};

/// JSON document written by `--export`.
#[derive(Debug, Serialize)]
pub struct ViewExport<'a> {
    pub metric: &'a str,
    pub year: i64,
    pub transform: Transform,
    pub title: String,
    pub distribution: &'a [f64],
    pub histogram: &'a [Bin],
    pub entities: &'a BTreeMap<String, f64>,
}

impl<'a> ViewExport<'a> {
    pub fn new(view: &'a View, histogram: &'a Histogram) -> Self {
        Self {
            metric: &view.metric,
            year: view.year,
            transform: view.transform,
            title: view.title("Histogram"),
            distribution: &view.distribution,
            histogram: &histogram.bins,
            entities: &view.entities,
        }
    }
}

pub fn to_json(view: &View, histogram: &Histogram) -> Result<String> {
    serde_json::to_string_pretty(&ViewExport::new(view, histogram)).context("serializing view")
}

pub fn write_json(path: &Path, view: &View, histogram: &Histogram) -> Result<()> {
    let json = to_json(view, histogram)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!(
        "Exported {} values and {} entities to {}",
        view.distribution.len(),
        view.entities.len(),
        path.display()
    );
    Ok(())
}
