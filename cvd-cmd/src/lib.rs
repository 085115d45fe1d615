//! Command implementations for the COVID-19 dashboard CLI.
//!
//! Provides subcommands for downloading the source files, printing the
//! regional and ranked summaries and writing chart descriptions as JSON.

use clap::{Args, Subcommand};
use cvd_db::{Database, DatasetConfig};
use std::path::PathBuf;

pub mod fetch;
pub mod query;
pub mod render;

/// Where the four source files are read from.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// JSON file naming the four source files; replaces --data-dir
    #[arg(long, global = true, env = "CVD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the four source CSV files
    #[arg(long, global = true, env = "CVD_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Override the path of the global daily totals (day_wise.csv)
    #[arg(long, global = true)]
    pub daily_global: Option<PathBuf>,

    /// Override the path of the per-country daily rows (full_grouped.csv)
    #[arg(long, global = true)]
    pub country_daily: Option<PathBuf>,

    /// Override the path of the latest per-country snapshot (country_wise_latest.csv)
    #[arg(long, global = true)]
    pub country_latest: Option<PathBuf>,

    /// Override the path of the demographic snapshot (worldometer_data.csv)
    #[arg(long, global = true)]
    pub country_demographic: Option<PathBuf>,
}

impl DataArgs {
    /// The dataset locations: the config file or the data directory,
    /// then any single-file overrides.
    pub fn config(&self) -> anyhow::Result<DatasetConfig> {
        let mut config = match &self.config {
            Some(path) => DatasetConfig::from_json_file(path)?,
            None => DatasetConfig::from_dir(&self.data_dir),
        };
        if let Some(path) = &self.daily_global {
            config.daily_global = path.clone();
        }
        if let Some(path) = &self.country_daily {
            config.country_daily = path.clone();
        }
        if let Some(path) = &self.country_latest {
            config.country_latest = path.clone();
        }
        if let Some(path) = &self.country_demographic {
            config.country_demographic = path.clone();
        }
        Ok(config)
    }

    pub fn open(&self) -> anyhow::Result<Database> {
        let config = self.config()?;
        let source = self.config.as_ref().unwrap_or(&self.data_dir);
        Database::open(&config)
            .map_err(|e| anyhow::anyhow!("Failed to load dataset from {}: {}", source.display(), e))
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Download the four source CSV files from a mirror
    Fetch {
        /// Base URL the files are served under
        #[arg(long)]
        base_url: String,

        /// Directory the files are written to
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,
    },

    /// Print case totals and rates per WHO region
    Summary,

    /// Print the countries with the highest cumulative count
    Top {
        /// Number of countries
        #[arg(short = 'n', long, default_value_t = 10)]
        n: usize,

        /// Ranking metric: Confirmed, Recovered, Deaths or Active
        #[arg(long, default_value = "Confirmed")]
        metric: String,
    },

    /// Render one dashboard view and write every chart as JSON
    Render {
        /// View to render: world, who or others
        #[arg(long)]
        view: String,

        /// Directory the chart files are written to
        #[arg(long)]
        out_dir: PathBuf,

        /// Selection applied after the initial render, as input=value (repeatable)
        #[arg(long = "set", value_parser = render::parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Write one line chart per global daily column as JSON
    Report {
        /// Directory the chart files are written to
        #[arg(long)]
        out_dir: PathBuf,
    },
}

pub async fn run(data: &DataArgs, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Fetch { base_url, out_dir } => fetch::run_fetch(&base_url, &out_dir).await,
        Command::Summary => {
            let db = data.open()?;
            query::run_summary(&db, std::io::stdout().lock())
        }
        Command::Top { n, metric } => {
            let db = data.open()?;
            query::run_top(&db, n, &metric, std::io::stdout().lock())
        }
        Command::Render { view, out_dir, set } => {
            let db = data.open()?;
            render::run_render(&db, &view, &out_dir, &set)
        }
        Command::Report { out_dir } => {
            let db = data.open()?;
            render::run_report(&db, &out_dir)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn overrides_replace_single_files() {
        let args = DataArgs {
            config: None,
            data_dir: PathBuf::from("data"),
            daily_global: None,
            country_daily: None,
            country_latest: Some(PathBuf::from("/tmp/latest.csv")),
            country_demographic: None,
        };
        let config = args.config().unwrap();
        assert_eq!(config.daily_global, Path::new("data").join("day_wise.csv"));
        assert_eq!(config.country_latest, PathBuf::from("/tmp/latest.csv"));
    }

    #[test]
    fn config_file_replaces_data_dir() {
        let dir = std::env::temp_dir().join(format!("cvd-args-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dataset.json");
        std::fs::write(
            &path,
            r#"{"daily_global": "a.csv", "country_daily": "b.csv",
                "country_latest": "c.csv", "country_demographic": "d.csv"}"#,
        )
        .unwrap();
        let args = DataArgs {
            config: Some(path),
            data_dir: PathBuf::from("ignored"),
            daily_global: Some(PathBuf::from("/tmp/daily.csv")),
            country_daily: None,
            country_latest: None,
            country_demographic: None,
        };
        let config = args.config().unwrap();
        assert_eq!(config.daily_global, PathBuf::from("/tmp/daily.csv"));
        assert_eq!(config.country_daily, dir.join("b.csv"));
        assert_eq!(config.country_demographic, dir.join("d.csv"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_fails_to_open() {
        let args = DataArgs {
            config: None,
            data_dir: PathBuf::from("/nonexistent/cvd"),
            daily_global: None,
            country_daily: None,
            country_latest: None,
            country_demographic: None,
        };
        assert!(args.open().is_err());
    }
}
