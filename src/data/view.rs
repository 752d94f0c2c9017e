use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::columns::ResolvedColumns;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// Per-value normalisation applied to a metric before charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    #[default]
    Raw,
    Log1p,
    Zscore,
    Minmax,
}

impl Transform {
    pub const ALL: [Transform; 4] = [
        Transform::Raw,
        Transform::Log1p,
        Transform::Zscore,
        Transform::Minmax,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Transform::Raw => "raw",
            Transform::Log1p => "log1p",
            Transform::Zscore => "zscore",
            Transform::Minmax => "minmax",
        }
    }

    /// Label shown next to the radio button.
    pub fn label(self) -> &'static str {
        match self {
            Transform::Raw => "Raw",
            other => other.as_str(),
        }
    }

    /// Transform every present value; missing entries stay missing.
    ///
    /// `zscore` and `minmax` fall back to all zeros when the present values
    /// have no spread.
    pub fn apply(self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        match self {
            Transform::Raw => values.to_vec(),
            Transform::Log1p => map_present(values, |v| v.max(0.0).ln_1p()),
            Transform::Zscore => {
                let present: Vec<f64> = values.iter().flatten().copied().collect();
                let Some((mn, mx)) = min_max(present.iter().copied()) else {
                    return values.to_vec();
                };
                // A rounded mean of equal values leaves a tiny non-zero spread.
                if mx == mn {
                    return map_present(values, |_| 0.0);
                }
                let n = present.len() as f64;
                let mu = present.iter().sum::<f64>() / n;
                let sd = (present.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / n).sqrt();
                if sd > 0.0 {
                    map_present(values, |v| (v - mu) / sd)
                } else {
                    map_present(values, |_| 0.0)
                }
            }
            Transform::Minmax => {
                let Some((mn, mx)) = min_max(values.iter().flatten().copied()) else {
                    return values.to_vec();
                };
                if mx > mn {
                    map_present(values, |v| (v - mn) / (mx - mn))
                } else {
                    map_present(values, |_| 0.0)
                }
            }
        }
    }
}

fn map_present(values: &[Option<f64>], f: impl Fn(f64) -> f64) -> Vec<Option<f64>> {
    values.iter().map(|v| v.map(&f)).collect()
}

/// Smallest and largest value, `None` for an empty input.
pub fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    })
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Transform::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown transform '{wanted}'"))
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// What the user currently looks at. Rebuilt from the controls on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub metric: String,
    /// `None` when the year input was malformed; the view then uses the
    /// dataset's latest year.
    pub year: Option<i64>,
    pub transform: Transform,
}

/// Parse a year control value. Only integer text (surrounding whitespace
/// allowed) is accepted; `"2000.0"` is `None` like any other malformed input.
pub fn parse_year(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

impl Selection {
    /// Default selection: first metric, latest year, raw values.
    pub fn initial(columns: &ResolvedColumns) -> Self {
        Self {
            metric: columns.metrics.first().cloned().unwrap_or_default(),
            year: Some(columns.years.max),
            transform: Transform::Raw,
        }
    }

    /// Build a selection from untrusted text inputs, falling back per field:
    /// unknown metric → first metric, malformed year → latest year, unknown
    /// transform → raw.
    pub fn from_inputs(
        columns: &ResolvedColumns,
        metric: Option<&str>,
        year: Option<&str>,
        transform: Option<&str>,
    ) -> Self {
        let mut selection = Self::initial(columns);

        if let Some(metric) = metric {
            if columns.metrics.iter().any(|m| m == metric) {
                selection.metric = metric.to_string();
            } else {
                log::warn!("metric '{metric}' is not available, using '{}'", selection.metric);
            }
        }
        if let Some(raw) = year {
            selection.year = parse_year(raw);
            if selection.year.is_none() {
                log::warn!("malformed year '{raw}', using {}", columns.years.max);
            }
        }
        if let Some(raw) = transform {
            selection.transform = raw.parse().unwrap_or_else(|e| {
                log::warn!("{e}, using raw values");
                Transform::Raw
            });
        }
        selection
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Derived data for one selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct View {
    pub metric: String,
    /// The year actually filtered on.
    pub year: i64,
    pub transform: Transform,
    /// Transformed values in row order, missing entries dropped.
    pub distribution: Vec<f64>,
    /// Entity → transformed value. A later row for the same entity wins.
    pub entities: BTreeMap<String, f64>,
}

impl View {
    pub fn title(&self, kind: &str) -> String {
        format!("{kind}: {} ({}) [{}]", self.metric, self.year, self.transform)
    }

    pub fn is_empty(&self) -> bool {
        self.distribution.is_empty()
    }
}

/// Filter to the selected year, coerce the metric, transform it and derive
/// the histogram and map inputs. Pure; never fails.
pub fn compute_view(dataset: &Dataset, columns: &ResolvedColumns, selection: &Selection) -> View {
    let year = selection.year.unwrap_or(columns.years.max);

    let year_idx = dataset.column_index(&columns.year);
    let country_idx = dataset.column_index(&columns.country);
    let metric_idx = dataset.column_index(&selection.metric);

    let rows: Vec<_> = dataset
        .rows()
        .iter()
        .filter(|row| {
            year_idx
                .and_then(|i| row[i].to_number())
                .is_some_and(|y| y == year as f64)
        })
        .collect();

    let raw: Vec<Option<f64>> = rows
        .iter()
        .map(|row| metric_idx.and_then(|i| row[i].to_number()))
        .collect();
    let transformed = selection.transform.apply(&raw);

    let distribution: Vec<f64> = transformed.iter().flatten().copied().collect();

    let mut entities = BTreeMap::new();
    for (row, value) in rows.iter().zip(&transformed) {
        let entity = country_idx.and_then(|i| row[i].as_label());
        if let (Some(entity), Some(value)) = (entity, value) {
            entities.insert(entity, *value);
        }
    }

    log::debug!(
        "view {}/{}/{}: {} rows, {} values, {} entities",
        selection.metric,
        year,
        selection.transform,
        rows.len(),
        distribution.len(),
        entities.len()
    );

    View {
        metric: selection.metric.clone(),
        year,
        transform: selection.transform,
        distribution,
        entities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::{CandidateLists, YearRange};
    use crate::data::model::CellValue;

    const EPS: f64 = 1e-9;

    fn row(country: &str, year: i64, co2: CellValue) -> Vec<CellValue> {
        vec![CellValue::String(country.into()), CellValue::Integer(year), co2]
    }

    fn sample() -> (Dataset, ResolvedColumns) {
        let ds = Dataset::from_rows(
            vec!["country".into(), "year".into(), "co2".into()],
            vec![
                row("A", 2000, CellValue::Integer(10)),
                row("B", 2000, CellValue::Integer(30)),
                row("C", 2000, CellValue::Integer(30)),
                row("A", 2001, CellValue::Integer(12)),
            ],
        );
        let cols = ResolvedColumns::resolve(&ds, &CandidateLists::default()).unwrap();
        (ds, cols)
    }

    fn select(year: Option<i64>, transform: Transform) -> Selection {
        Selection {
            metric: "co2".into(),
            year,
            transform,
        }
    }

    fn mean_sd(values: &[f64]) -> (f64, f64) {
        let n = values.len() as f64;
        let mu = values.iter().sum::<f64>() / n;
        let sd = (values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / n).sqrt();
        (mu, sd)
    }

    #[test]
    fn minmax_example() {
        let (ds, cols) = sample();
        let view = compute_view(&ds, &cols, &select(Some(2000), Transform::Minmax));
        assert_eq!(view.distribution, vec![0.0, 1.0, 1.0]);
        assert_eq!(view.entities["A"], 0.0);
        assert_eq!(view.entities["B"], 1.0);
        assert_eq!(view.entities["C"], 1.0);
        assert_eq!(view.entities.len(), 3);
    }

    #[test]
    fn zscore_example() {
        let (ds, cols) = sample();
        let view = compute_view(&ds, &cols, &select(Some(2000), Transform::Zscore));
        let a = view.entities["A"];
        assert!((a - (10.0 - 70.0 / 3.0) / (800.0f64 / 9.0).sqrt()).abs() < EPS);
        assert!((a + 1.41).abs() < 0.01);
        let (mu, sd) = mean_sd(&view.distribution);
        assert!(mu.abs() < EPS);
        assert!((sd - 1.0).abs() < EPS);
    }

    #[test]
    fn absent_year_yields_empty_view() {
        let (ds, cols) = sample();
        let view = compute_view(&ds, &cols, &select(Some(1850), Transform::Raw));
        assert!(view.distribution.is_empty());
        assert!(view.entities.is_empty());
        assert!(view.is_empty());
    }

    #[test]
    fn malformed_year_uses_latest_year() {
        let (ds, cols) = sample();
        assert_eq!(cols.years, YearRange { min: 2000, max: 2001 });
        let view = compute_view(&ds, &cols, &select(None, Transform::Raw));
        assert_eq!(view.year, 2001);
        assert_eq!(view.distribution, vec![12.0]);
    }

    #[test]
    fn recomputing_is_idempotent() {
        let (ds, cols) = sample();
        for t in Transform::ALL {
            let sel = select(Some(2000), t);
            assert_eq!(compute_view(&ds, &cols, &sel), compute_view(&ds, &cols, &sel));
        }
    }

    #[test]
    fn invalid_metric_cells_become_missing() {
        let ds = Dataset::from_rows(
            vec!["country".into(), "year".into(), "co2".into()],
            vec![
                row("A", 2000, CellValue::String("n/a".into())),
                row("B", 2000, CellValue::Float(f64::INFINITY)),
                row("C", 2000, CellValue::Float(f64::NEG_INFINITY)),
                row("D", 2000, CellValue::Float(4.0)),
                vec![CellValue::Null, CellValue::Integer(2000), CellValue::Float(5.0)],
            ],
        );
        let cols = ResolvedColumns::resolve(&ds, &CandidateLists::default()).unwrap();
        let view = compute_view(&ds, &cols, &select(Some(2000), Transform::Log1p));
        assert_eq!(view.distribution.len(), 2);
        assert!((view.entities["D"] - 5.0f64.ln()).abs() < EPS);
        assert_eq!(view.entities.len(), 1);
    }

    #[test]
    fn unknown_metric_column_is_permissive() {
        let (ds, cols) = sample();
        let sel = Selection {
            metric: "does_not_exist".into(),
            year: Some(2000),
            transform: Transform::Zscore,
        };
        let view = compute_view(&ds, &cols, &sel);
        assert!(view.distribution.is_empty());
        assert!(view.entities.is_empty());
    }

    #[test]
    fn string_years_are_coerced_for_filtering() {
        let ds = Dataset::from_rows(
            vec!["country".into(), "year".into(), "co2".into()],
            vec![
                vec![CellValue::String("A".into()), CellValue::String("2000".into()), CellValue::Integer(1)],
                vec![CellValue::String("B".into()), CellValue::String("later".into()), CellValue::Integer(2)],
            ],
        );
        let cols = ResolvedColumns::resolve(&ds, &CandidateLists::default()).unwrap();
        let view = compute_view(&ds, &cols, &select(Some(2000), Transform::Raw));
        assert_eq!(view.distribution, vec![1.0]);
    }

    #[test]
    fn log1p_clamps_negatives() {
        let out = Transform::Log1p.apply(&[Some(-5.0), Some(0.0), Some(std::f64::consts::E - 1.0), None]);
        assert_eq!(out[0], Some(0.0));
        assert_eq!(out[1], Some(0.0));
        assert!((out[2].unwrap() - 1.0).abs() < EPS);
        assert_eq!(out[3], None);
    }

    #[test]
    fn degenerate_spreads_yield_zeros() {
        let same = [Some(7.0), None, Some(7.0)];
        assert_eq!(Transform::Zscore.apply(&same), vec![Some(0.0), None, Some(0.0)]);
        assert_eq!(Transform::Minmax.apply(&same), vec![Some(0.0), None, Some(0.0)]);
        assert_eq!(Transform::Zscore.apply(&[Some(3.0)]), vec![Some(0.0)]);
        assert_eq!(Transform::Minmax.apply(&[None, None]), vec![None, None]);
    }

    #[test]
    fn inexact_equal_values_yield_zeros() {
        for v in [0.1, 0.3, 1.0 / 3.0, 2.2e-7, 402.137] {
            let values = vec![Some(v), None, Some(v), Some(v), None, Some(v), Some(v)];
            let expected: Vec<Option<f64>> =
                values.iter().map(|x| x.map(|_| 0.0)).collect();
            assert_eq!(Transform::Zscore.apply(&values), expected, "zscore of {v}");
            assert_eq!(Transform::Minmax.apply(&values), expected, "minmax of {v}");
        }
        assert_eq!(Transform::Zscore.apply(&[Some(0.1); 3]), vec![Some(0.0); 3]);
    }

    fn spread_samples() -> Vec<Vec<Option<f64>>> {
        vec![
            vec![Some(0.1), None, Some(0.2), Some(0.3), None, Some(10.7)],
            vec![None, Some(-4.25), Some(1e6), None, Some(3.0), Some(3.0), Some(-0.001)],
            vec![Some(402.1), Some(5.5), None, Some(12.0), Some(0.0), Some(7.77), None, Some(9.9)],
            vec![Some(1.0 / 3.0), Some(2.0 / 3.0)],
        ]
    }

    #[test]
    fn zscore_centres_and_scales_with_missing_entries() {
        for values in spread_samples() {
            let out = Transform::Zscore.apply(&values);
            for (before, after) in values.iter().zip(&out) {
                assert_eq!(before.is_some(), after.is_some());
            }
            let present: Vec<f64> = out.iter().flatten().copied().collect();
            let (mu, sd) = mean_sd(&present);
            assert!(mu.abs() < 1e-9, "mean {mu} for {values:?}");
            assert!((sd - 1.0).abs() < 1e-9, "sd {sd} for {values:?}");
        }
    }

    #[test]
    fn minmax_spans_unit_interval_with_missing_entries() {
        for values in spread_samples() {
            let out = Transform::Minmax.apply(&values);
            for (before, after) in values.iter().zip(&out) {
                assert_eq!(before.is_some(), after.is_some());
            }
            let present: Vec<f64> = out.iter().flatten().copied().collect();
            assert!(present.iter().all(|v| (0.0..=1.0).contains(v)), "{present:?}");
            assert_eq!(min_max(present.iter().copied()), Some((0.0, 1.0)));
        }
    }

    #[test]
    fn minmax_stays_in_unit_interval() {
        let values: Vec<Option<f64>> = [-3.5, 0.0, 12.25, 99.0, 4.0, -3.5]
            .into_iter()
            .map(Some)
            .collect();
        let out = Transform::Minmax.apply(&values);
        assert!(out.iter().flatten().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(out[0], Some(0.0));
        assert_eq!(out[3], Some(1.0));
    }

    #[test]
    fn transform_names_parse_case_insensitively() {
        assert_eq!("zscore".parse::<Transform>(), Ok(Transform::Zscore));
        assert_eq!(" MinMax ".parse::<Transform>(), Ok(Transform::Minmax));
        assert!("sqrt".parse::<Transform>().is_err());
    }

    #[test]
    fn selection_inputs_fall_back_per_field() {
        let (_, cols) = sample();
        let sel = Selection::from_inputs(&cols, Some("gdp"), Some("20x1"), Some("cube"));
        assert_eq!(sel.metric, "co2");
        assert_eq!(sel.year, None);
        assert_eq!(sel.transform, Transform::Raw);

        let sel = Selection::from_inputs(&cols, Some("co2"), Some(" 2000 "), Some("log1p"));
        assert_eq!(sel.year, Some(2000));
        assert_eq!(sel.transform, Transform::Log1p);

        assert_eq!(Selection::from_inputs(&cols, None, None, None), Selection::initial(&cols));
    }

    #[test]
    fn parse_year_accepts_integral_text_only() {
        assert_eq!(parse_year("1999"), Some(1999));
        assert_eq!(parse_year(" 2001 "), Some(2001));
        assert_eq!(parse_year("2000.0"), None);
        assert_eq!(parse_year("2000.5"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn titles_name_the_selection() {
        let (ds, cols) = sample();
        let view = compute_view(&ds, &cols, &select(Some(2000), Transform::Log1p));
        assert_eq!(view.title("Histogram"), "Histogram: co2 (2000) [log1p]");
    }
}
