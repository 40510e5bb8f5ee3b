use clap::Parser;
use chrono::NaiveDate;
use crate::local_store::DEFAULT_STORE_PATH;
use std::path::PathBuf;

/// Recycling and utility consumption dashboard for schools
#[derive(Parser, Debug, Clone)]
#[command(name = "Eco Dashboard")]
#[command(about = "Track school recycling, water and energy use", long_about = None)]
#[command(version)]
pub struct Args {
    /// Use in-memory database for testing
    #[arg(long, help = "Use in-memory database for testing")]
    pub test: bool,

    /// Custom database file path
    #[arg(long, value_name = "PATH", help = "Use custom database file path")]
    pub db_path: Option<PathBuf>,

    /// Override current date for testing (YYYY-MM-DD format)
    #[arg(
        long,
        value_name = "DATE",
        help = "Override current date (YYYY-MM-DD format)"
    )]
    pub override_date: Option<String>,

    /// Local state file (achievements, dismissed tips, custom factors)
    #[arg(
        long,
        value_name = "PATH",
        help = "Use custom local state file path"
    )]
    pub store_path: Option<PathBuf>,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Local state file, next to the working directory by default
    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
    }

    /// Validate the override_date argument if provided
    pub fn validate_override_date(&self) -> Result<Option<NaiveDate>, String> {
        match &self.override_date {
            Some(date_str) => {
                NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                    .map(Some)
                    .map_err(|_| {
                        format!(
                            "Invalid date format for --override-date: '{}'. Expected YYYY-MM-DD",
                            date_str
                        )
                    })
            }
            None => Ok(None),
        }
    }
}
