use crate::schema;
use crate::table::Table;
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row, TypeInfo, ValueRef};
use std::fmt;
use std::path::Path;
use tracing::{debug, error, info, trace};

/// A raw stored value; SQLite keeps whatever type the column affinity produced.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Integer(i) => write!(f, "{i}"),
            // whole floats keep their decimal point, e.g. 5.0
            Cell::Real(r) if r.fract() == 0.0 && r.abs() < 1e15 => write!(f, "{r:.1}"),
            Cell::Real(r) => write!(f, "{r}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Blob(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

/// Single short-lived handle on the SQLite file.
pub struct Store {
    conn: SqliteConnection,
}

impl Store {
    /// Open (or create) the database file at `path`.
    pub async fn open(path: &Path) -> Result<Self> {
        trace!("opening store at {path:?}");
        let conn = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .connect()
            .await
            .map_err(|err| {
                error!("failed to open store at {path:?}, error({err})");
                err
            })?;
        debug!("store connection established");
        Ok(Self { conn })
    }

    /// Create the fundamentals table if absent.
    pub async fn ensure_schema(&mut self) -> Result<()> {
        sqlx::query(&schema::create_table())
            .execute(&mut self.conn)
            .await
            .map_err(|err| {
                error!("failed to create {}, error({err})", schema::TABLE);
                err
            })?;
        Ok(())
    }

    /// Insert or replace every row of `table`, keyed on the composite key.
    ///
    /// Each row is its own committed statement; the first failure stops the loop and
    /// leaves the rows before it written. The table's columns must match the schema.
    pub async fn upsert(&mut self, table: &Table) -> Result<usize> {
        let time = std::time::Instant::now();
        schema::check_labels(table.columns()).map_err(|err| {
            error!("refusing to upsert, error({err})");
            err
        })?;

        let stmt = schema::upsert_row();
        let mut written = 0;
        for row in table.rows() {
            let mut query = sqlx::query(&stmt).bind(row.key());
            for value in row.values() {
                query = query.bind(value.as_str());
            }
            query.execute(&mut self.conn).await.map_err(|err| {
                error!("failed to upsert [{}], error({err})", row.key());
                err
            })?;
            trace!("upserted [{}]", row.key());
            written += 1;
        }

        debug!("{written} rows upserted. {}", crate::time_elapsed(time));
        Ok(written)
    }

    /// Every stored row, key first, in storage order.
    pub async fn read_all(&mut self) -> Result<Vec<Vec<Cell>>> {
        let rows = sqlx::query(&schema::select_all())
            .fetch_all(&mut self.conn)
            .await
            .map_err(|err| {
                error!("failed to read {}, error({err})", schema::TABLE);
                err
            })?;

        rows.iter().map(read_cells).collect()
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        trace!("store connection closed");
        Ok(())
    }
}

fn read_cells(row: &SqliteRow) -> Result<Vec<Cell>> {
    (0..row.len())
        .map(|i| -> Result<Cell> {
            let raw = row.try_get_raw(i)?;
            if raw.is_null() {
                return Ok(Cell::Null);
            }
            let kind = raw.type_info().name().to_string();
            let cell = match kind.as_str() {
                "INTEGER" => Cell::Integer(row.try_get(i)?),
                "REAL" => Cell::Real(row.try_get(i)?),
                "BLOB" => Cell::Blob(row.try_get(i)?),
                _ => Cell::Text(row.try_get(i)?),
            };
            Ok(cell)
        })
        .collect()
}

/// Open the store, make sure the table exists, upsert `table`, and close the handle
/// whatever the outcome.
pub async fn persist(path: &Path, table: &Table) -> Result<usize> {
    let mut store = Store::open(path).await?;

    let result = match store.ensure_schema().await {
        Ok(()) => store.upsert(table).await,
        Err(err) => Err(err),
    };

    if let Err(err) = store.close().await {
        error!("failed to close store, error({err})");
    }

    match &result {
        Ok(written) => info!("{written} rows persisted to {path:?}"),
        Err(err) => error!("persisting to {path:?} stopped, error({err})"),
    }
    result
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::METRIC_COLUMNS;
    use crate::SpiderError;

    fn row(symbol: &str, date: &str, pb: &str) -> (String, Vec<String>) {
        let values = [
            symbol, "Tech", "Large", "Growth", date, pb, "31.2", "25", "2.1", "1.5", "6.1",
            "0.5%", "150%", "55%", "12.5%", "0.07%",
        ];
        (
            format!("{symbol} {date}"),
            values.iter().map(|v| v.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn upsert_is_idempotent_later_data_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fundamentals.db");

        let mut first = Table::new(&METRIC_COLUMNS);
        let (key, values) = row("AAPL", "2026-10-19", "40.1");
        first.insert(key, values);
        persist(&path, &first).await.unwrap();

        let mut second = Table::new(&METRIC_COLUMNS);
        let (key, values) = row("AAPL", "2026-10-19", "41.7");
        second.insert(key, values);
        persist(&path, &second).await.unwrap();

        let mut store = Store::open(&path).await.unwrap();
        let rows = store.read_all().await.unwrap();
        store.close().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], Cell::Text("AAPL 2026-10-19".into()));
        assert_eq!(rows[0][6], Cell::Real(41.7));
    }

    #[tokio::test]
    async fn affinity_converts_ratios_but_not_untyped_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fundamentals.db");

        let mut table = Table::new(&METRIC_COLUMNS);
        let (key, values) = row("ALLY", "2026-10-19", "0.7");
        table.insert(key, values);
        persist(&path, &table).await.unwrap();

        let mut store = Store::open(&path).await.unwrap();
        let rows = store.read_all().await.unwrap();
        store.close().await.unwrap();

        let cells = &rows[0];
        assert_eq!(cells.len(), 17);
        assert_eq!(cells[1], Cell::Text("ALLY".into()));
        assert_eq!(cells[5], Cell::Text("2026-10-19".into()));
        assert_eq!(cells[12], Cell::Real(0.5));
        assert_eq!(cells[13], Cell::Real(150.0));
        assert_eq!(cells[15], Cell::Text("12.5".into()));
    }

    #[tokio::test]
    async fn upsert_rejects_diverging_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fundamentals.db");

        let mut table = Table::new(&["Ticker", "P/B"]);
        table.insert("AAPL 2026-10-19".into(), vec!["AAPL".into(), "40.1".into()]);

        let err = persist(&path, &table).await.unwrap_err();
        assert!(matches!(err, SpiderError::ColumnMismatch { .. }));

        let mut store = Store::open(&path).await.unwrap();
        assert!(store.read_all().await.unwrap().is_empty());
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn failed_write_keeps_earlier_rows_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fundamentals.db");

        let mut store = Store::open(&path).await.unwrap();
        store.ensure_schema().await.unwrap();
        sqlx::query(
            "CREATE TRIGGER reject_bad BEFORE INSERT ON stock_fundamentals
             WHEN NEW.ticker = 'BAD'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(&mut store.conn)
        .await
        .unwrap();
        store.close().await.unwrap();

        let mut table = Table::new(&METRIC_COLUMNS);
        for symbol in ["AAPL", "BAD", "ALLY"] {
            let (key, values) = row(symbol, "2026-10-19", "1.0");
            table.insert(key, values);
        }

        let err = persist(&path, &table).await.unwrap_err();
        assert!(matches!(err, SpiderError::Store(_)));

        let mut store = Store::open(&path).await.unwrap();
        let rows = store.read_all().await.unwrap();
        store.close().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], Cell::Text("AAPL 2026-10-19".into()));
    }

    #[test]
    fn whole_reals_keep_decimal_point() {
        assert_eq!(Cell::Real(5.0).to_string(), "5.0");
        assert_eq!(Cell::Real(12.3).to_string(), "12.3");
        assert_eq!(Cell::Integer(150).to_string(), "150");
        assert_eq!(Cell::Null.to_string(), "");
    }
}
