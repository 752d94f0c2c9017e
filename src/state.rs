use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color::ColorScale;
use crate::data::columns::{CandidateLists, ResolvedColumns};
use crate::data::histogram::{DEFAULT_BINS, Histogram};
use crate::data::model::Dataset;
use crate::data::view::{Selection, Transform, View, compute_view};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// File the dataset was read from.
    pub source: PathBuf,

    /// Loaded dataset. Read-only; replaced wholesale on File → Open.
    pub dataset: Dataset,

    /// Column roles resolved for `dataset`.
    pub columns: ResolvedColumns,

    /// Candidate names used when a new file is opened.
    pub candidates: CandidateLists,

    /// Current control values.
    pub selection: Selection,

    /// View for `selection` (cached, recomputed on every control change).
    pub view: View,

    /// Binned `view.distribution`.
    pub histogram: Histogram,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(
        source: PathBuf,
        dataset: Dataset,
        columns: ResolvedColumns,
        candidates: CandidateLists,
        selection: Selection,
    ) -> Self {
        let mut state = Self {
            source,
            dataset,
            columns,
            candidates,
            selection,
            view: View::default(),
            histogram: Histogram::default(),
            status_message: None,
        };
        state.recompute();
        state
    }

    /// Rebuild the view from the current selection.
    pub fn recompute(&mut self) {
        self.view = compute_view(&self.dataset, &self.columns, &self.selection);
        self.histogram = Histogram::from_values(&self.view.distribution, DEFAULT_BINS);
    }

    pub fn set_metric(&mut self, metric: String) {
        if self.selection.metric != metric {
            self.selection.metric = metric;
            self.recompute();
        }
    }

    pub fn set_year(&mut self, year: i64) {
        if self.selection.year != Some(year) {
            self.selection.year = Some(year);
            self.recompute();
        }
    }

    pub fn set_transform(&mut self, transform: Transform) {
        if self.selection.transform != transform {
            self.selection.transform = transform;
            self.recompute();
        }
    }

    /// Year shown on the slider: the filtered year, which is the latest year
    /// when the selection carries none.
    pub fn effective_year(&self) -> i64 {
        self.selection.year.unwrap_or(self.columns.years.max)
    }

    /// Colour scale spanning the entity values of the current view.
    pub fn color_scale(&self) -> Option<ColorScale> {
        ColorScale::spanning(self.view.entities.values().copied())
    }

    /// Swap in a freshly loaded dataset. Nothing changes unless its columns
    /// resolve. The metric is kept when the new dataset offers it, the year
    /// is clamped into the new range.
    pub fn replace_dataset(&mut self, source: &Path, dataset: Dataset) -> Result<()> {
        let columns = ResolvedColumns::resolve(&dataset, &self.candidates)
            .with_context(|| format!("resolving columns of {}", source.display()))?;

        let mut selection = Selection::initial(&columns);
        if columns.metrics.contains(&self.selection.metric) {
            selection.metric = self.selection.metric.clone();
        }
        selection.year = Some(
            self.effective_year()
                .clamp(columns.years.min, columns.years.max),
        );
        selection.transform = self.selection.transform;

        self.source = source.to_path_buf();
        self.dataset = dataset;
        self.columns = columns;
        self.selection = selection;
        self.status_message = None;
        self.recompute();
        Ok(())
    }
}
