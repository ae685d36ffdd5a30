//! Compiled-in configuration; nothing is read from the environment at runtime.
use std::path::PathBuf;
use std::time::Duration;

/// Host serving the `quote.ashx` pages.
pub const SOURCE_HOST: &str = "https://finviz.com";

/// Identifying header sent with every quote request.
pub const USER_AGENT: &str = "my-app/0.0.1";

/// Courtesy pause after each quote request.
pub const REQUEST_DELAY: Duration = Duration::from_secs(5);

pub const DATABASE_PATH: &str = "Stock_Fundamentals_database.db";
pub const OUTPUT_DIR: &str = ".";
pub const CSV_NAME: &str = "Stock_fundamentals.csv";

/// Stocks of interest: `(ticker, sector, market cap, type)`.
pub const TRACKED_INSTRUMENTS: &[(&str, &str, &str, &str)] = &[
    ("amzn", "consumer discretionary", "large", "growth"),
    ("goog", "telecom", "large", "growth"),
    ("aapl", "tech", "large", "value"),
    ("ally", "financials", "mid", "value"),
    ("brk-b", "financials", "large", "value"),
];

/// Column labels of the output table, in storage order (after the key).
///
/// The first five are filled from the instrument and the run date, the rest are Finviz
/// snapshot labels.
pub const METRIC_COLUMNS: [&str; 16] = [
    "Ticker",
    "Sector",
    "Market Cap",
    "Type",
    "Date",
    "P/B",
    "P/E",
    "Forward P/E",
    "PEG",
    "Debt/Eq",
    "EPS (ttm)",
    "Dividend %",
    "ROE",
    "ROI",
    "EPS Q/Q",
    "Insider Own",
];

#[derive(Clone, Debug)]
pub struct SpiderConfig {
    pub source_host: String,
    pub user_agent: String,
    pub request_delay: Duration,
    pub database_path: PathBuf,
    pub output_dir: PathBuf,
    pub csv_name: String,
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            source_host: SOURCE_HOST.to_string(),
            user_agent: USER_AGENT.to_string(),
            request_delay: REQUEST_DELAY,
            database_path: PathBuf::from(DATABASE_PATH),
            output_dir: PathBuf::from(OUTPUT_DIR),
            csv_name: CSV_NAME.to_string(),
        }
    }
}

impl SpiderConfig {
    /// Full path of the exported CSV file.
    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv_name)
    }
}
