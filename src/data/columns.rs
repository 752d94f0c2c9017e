use thiserror::Error;

use super::model::Dataset;

/// Number of numeric columns offered when none of the preferred metrics exist.
pub const FALLBACK_METRIC_COUNT: usize = 5;

pub const COUNTRY_CANDIDATES: &[&str] = &["country", "Country", "entity", "Entity", "name", "Name"];
pub const YEAR_CANDIDATES: &[&str] = &["year", "Year", "YEAR"];
pub const TOTAL_CANDIDATES: &[&str] = &[
    "co2",
    "CO2",
    "total_co2",
    "total_emissions",
    "emissions",
    "Total_CO2",
    "Total Emissions",
];
/// Metrics listed after the resolved total, in display order.
pub const PREFERRED_METRICS: &[&str] = &[
    "co2_per_capita",
    "share_global_co2",
    "coal_co2",
    "oil_co2",
    "gas_co2",
    "cement_co2",
    "flaring_co2",
];

#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("could not detect a {role} column (tried: {})", .candidates.join(", "))]
    MissingColumn {
        role: &'static str,
        candidates: Vec<String>,
    },
    #[error("year column '{column}' has no numeric values")]
    NoYears { column: String },
}

/// Ordered candidate names for each logical field. First match wins.
#[derive(Debug, Clone)]
pub struct CandidateLists {
    pub country: Vec<String>,
    pub year: Vec<String>,
    pub total: Vec<String>,
    pub preferred_metrics: Vec<String>,
}

impl Default for CandidateLists {
    fn default() -> Self {
        fn owned(names: &[&str]) -> Vec<String> {
            names.iter().map(|n| n.to_string()).collect()
        }
        Self {
            country: owned(COUNTRY_CANDIDATES),
            year: owned(YEAR_CANDIDATES),
            total: owned(TOTAL_CANDIDATES),
            preferred_metrics: owned(PREFERRED_METRICS),
        }
    }
}

/// Inclusive year bounds found in the year column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i64,
    pub max: i64,
}

/// Column roles chosen once per dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumns {
    pub country: String,
    pub year: String,
    /// The total-emissions column, when one of the candidates exists.
    pub total: Option<String>,
    /// Selectable metrics, in display order.
    pub metrics: Vec<String>,
    pub years: YearRange,
}

/// Return the first candidate that is an actual column of `dataset`.
pub fn pick_first_column<S: AsRef<str>>(dataset: &Dataset, candidates: &[S]) -> Option<String> {
    candidates
        .iter()
        .map(|c| c.as_ref())
        .find(|c| dataset.has_column(c))
        .map(str::to_string)
}

/// Preferred metrics that are numeric columns, in preferred order; otherwise
/// the first few numeric columns in table order.
pub fn derive_metrics<S: AsRef<str>>(dataset: &Dataset, preferred: &[S]) -> Vec<String> {
    let numeric = dataset.numeric_columns();
    let mut metrics: Vec<String> = Vec::new();
    for name in preferred.iter().map(|p| p.as_ref()) {
        if numeric.iter().any(|c| c == name) && !metrics.iter().any(|m| m == name) {
            metrics.push(name.to_string());
        }
    }
    if metrics.is_empty() {
        metrics = numeric.into_iter().take(FALLBACK_METRIC_COUNT).collect();
    }
    metrics
}

/// Min and max of the numeric-coerced year column, truncated to integers.
pub fn year_range(dataset: &Dataset, year_col: &str) -> Option<YearRange> {
    let (min, max) = dataset
        .column(year_col)
        .filter_map(|cell| cell.to_number())
        .fold(None, |acc: Option<(f64, f64)>, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })?;
    Some(YearRange {
        min: min as i64,
        max: max as i64,
    })
}

impl ResolvedColumns {
    /// Resolve every column role. Fails only when the country or year column
    /// is absent, or when no year is numeric.
    pub fn resolve(dataset: &Dataset, candidates: &CandidateLists) -> Result<Self, ResolveError> {
        let country = pick_first_column(dataset, &candidates.country).ok_or_else(|| {
            ResolveError::MissingColumn {
                role: "country",
                candidates: candidates.country.clone(),
            }
        })?;
        let year = pick_first_column(dataset, &candidates.year).ok_or_else(|| {
            ResolveError::MissingColumn {
                role: "year",
                candidates: candidates.year.clone(),
            }
        })?;
        let total = pick_first_column(dataset, &candidates.total);
        if total.is_none() {
            log::warn!("no total-emissions column found, falling back to numeric columns");
        }

        let preferred: Vec<&str> = total
            .as_deref()
            .into_iter()
            .chain(candidates.preferred_metrics.iter().map(String::as_str))
            .collect();
        let metrics = derive_metrics(dataset, &preferred);

        let years = year_range(dataset, &year).ok_or_else(|| ResolveError::NoYears {
            column: year.clone(),
        })?;

        log::info!(
            "Resolved columns: country='{country}', year='{year}' ({}..={}), metrics={metrics:?}",
            years.min,
            years.max
        );

        Ok(Self {
            country,
            year,
            total,
            metrics,
            years,
        })
    }
}
