use std::path::PathBuf;

use clap::Parser;

/// Explore an emissions table by metric, year and transform.
#[derive(Debug, Parser)]
#[command(name = "emissions-explorer", version)]
#[command(about = "Histogram and choropleth explorer for tabular emissions data")]
pub struct Cli {
    /// Data file (.csv, .json or .parquet)
    #[arg(long, env = "EMISSIONS_DATA", default_value = "../data/co2_emissions.csv")]
    pub data: PathBuf,

    /// Initial metric column
    #[arg(long)]
    pub metric: Option<String>,

    /// Initial year; malformed values fall back to the latest year
    #[arg(long)]
    pub year: Option<String>,

    /// Initial transform: raw, log1p, zscore or minmax
    #[arg(long)]
    pub transform: Option<String>,

    /// Write the view for the initial selection as JSON and exit
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_flags_are_kept_as_raw_text() {
        let cli = Cli::try_parse_from([
            "emissions-explorer",
            "--data",
            "owid.csv",
            "--year",
            "latest",
            "--transform",
            "zscore",
        ])
        .unwrap();
        assert_eq!(cli.data, PathBuf::from("owid.csv"));
        assert_eq!(cli.year.as_deref(), Some("latest"));
        assert_eq!(cli.transform.as_deref(), Some("zscore"));
        assert_eq!(cli.metric, None);
        assert_eq!(cli.export, None);
    }

    #[test]
    fn command_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
