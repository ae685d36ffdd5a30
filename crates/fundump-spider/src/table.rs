use crate::extract::Document;
use crate::finviz::Fetcher;
use crate::instrument::Instrument;
use crate::tui::Progress;
use crate::Result;
use chrono::NaiveDate;
use tracing::{debug, error, info, trace, warn};

/// Format of the observation date, both in the key and the `Date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One instrument's observation, keyed by `"{symbol} {date}"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    key: String,
    values: Vec<String>,
}

impl Row {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Values in the table's column order.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// In-memory table of fundamentals, one row per instrument, unique keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: vec![],
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.key == key)
    }

    /// Value of column `label` in `row`.
    pub fn value<'a>(&self, row: &'a Row, label: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| c == label)
            .and_then(|i| row.values.get(i))
            .map(String::as_str)
    }

    /// Insert `values` under `key`, stripping every `%`. A row already under `key` is
    /// replaced in place.
    pub fn insert(&mut self, key: String, values: Vec<String>) {
        let row = Row {
            key,
            values: values.iter().map(|v| strip_percent(v)).collect(),
        };
        match self.rows.iter_mut().find(|r| r.key == row.key) {
            Some(existing) => {
                debug!("replacing duplicate row [{}]", row.key);
                *existing = row;
            }
            None => self.rows.push(row),
        }
    }
}

/// Remove every percent symbol: `"12.3%"` -> `"12.3"`.
pub fn strip_percent(value: &str) -> String {
    value.replace('%', "")
}

/// Composite key of an observation: symbol, a single space, the date.
pub fn composite_key(symbol: &str, date: &str) -> String {
    format!("{symbol} {date}")
}

/// Build the table for today's (local) date.
pub async fn build_table<S: AsRef<str>>(
    fetcher: &Fetcher,
    instruments: &[Instrument],
    columns: &[S],
    progress: &Progress,
) -> Result<Table> {
    let today = chrono::Local::now().date_naive();
    build_table_on(fetcher, instruments, columns, today, progress).await
}

/// Fetch every instrument once and fill one row per instrument.
///
/// A failure for one instrument (page or field not found, an HTTP error status, a
/// transport error) is logged with its symbol and that instrument is left out; the rest
/// of the batch carries on.
pub async fn build_table_on<S: AsRef<str>>(
    fetcher: &Fetcher,
    instruments: &[Instrument],
    columns: &[S],
    date: NaiveDate,
    progress: &Progress,
) -> Result<Table> {
    let time = std::time::Instant::now();
    let date = date.format(DATE_FORMAT).to_string();
    let mut table = Table::new(columns);

    for instrument in instruments {
        let symbol = instrument.symbol();
        let values = match fetcher.fetch(instrument).await {
            Ok(document) => fill_row(&document, instrument, columns, &date),
            Err(err) => Err(err),
        };

        match values {
            Ok(values) => {
                trace!("row built for {symbol}");
                table.insert(composite_key(symbol, &date), values);
                progress.succeeded();
            }
            Err(err) if err.is_not_found() => {
                warn!("{symbol} not found, error({err})");
                progress.failed();
            }
            Err(err) => {
                error!("failed to build row for {symbol}, skipping, error({err})");
                progress.failed();
            }
        }
    }

    info!(
        "{} of {} instruments tabled. {}",
        table.len(),
        instruments.len(),
        crate::time_elapsed(time)
    );
    Ok(table)
}

/// Identity columns come from the instrument, `Date` from the run, every other column
/// is looked up on the page by its label.
fn fill_row<S: AsRef<str>>(
    document: &Document,
    instrument: &Instrument,
    columns: &[S],
    date: &str,
) -> Result<Vec<String>> {
    columns
        .iter()
        .map(|column| match column.as_ref() {
            "Ticker" => Ok(instrument.symbol().to_string()),
            "Sector" => Ok(instrument.sector().to_string()),
            "Market Cap" => Ok(instrument.cap_class().to_string()),
            "Type" => Ok(instrument.style().to_string()),
            "Date" => Ok(date.to_string()),
            field => document.field(field),
        })
        .collect()
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
