use crate::{Result, SpiderError};

/// The single table holding every fundamentals row ever scraped.
pub const TABLE: &str = "stock_fundamentals";

/// Label of the implicit key column in the CSV header.
pub const KEY_LABEL: &str = "Index";

/// A declared column: SQL name, SQL type (empty for untyped), and the human-readable label
/// used by the table builder and the CSV header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub label: &'static str,
}

const fn col(name: &'static str, sql_type: &'static str, label: &'static str) -> Column {
    Column {
        name,
        sql_type,
        label,
    }
}

/// Key column, always first.
pub const KEY: Column = col("index_key", "TEXT PRIMARY KEY", KEY_LABEL);

/// Value columns, in declared order.
///
/// `EPS_QoQ` is left untyped, so SQLite stores whatever it is given (e.g. "-") as is,
/// where the FLOAT columns convert numeric-looking text.
pub const COLUMNS: [Column; 16] = [
    col("ticker", "TEXT", "Ticker"),
    col("sector", "TEXT", "Sector"),
    col("market_cap", "TEXT", "Market Cap"),
    col("type", "TEXT", "Type"),
    col("date", "TIMESTAMP", "Date"),
    col("PB", "FLOAT", "P/B"),
    col("PE", "FLOAT", "P/E"),
    col("Forward_PE", "FLOAT", "Forward P/E"),
    col("PEG", "FLOAT", "PEG"),
    col("Debt_Eq", "FLOAT", "Debt/Eq"),
    col("EPS_ttm", "FLOAT", "EPS (ttm)"),
    col("Dividend_pct", "FLOAT", "Dividend %"),
    col("ROE", "FLOAT", "ROE"),
    col("ROI", "FLOAT", "ROI"),
    col("EPS_QoQ", "", "EPS Q/Q"),
    col("Insider_own", "FLOAT", "Insider Own"),
];

/// `CREATE TABLE IF NOT EXISTS ...` for [TABLE].
pub fn create_table() -> String {
    let mut defs = vec![format!("{} {}", KEY.name, KEY.sql_type)];
    defs.extend(
        COLUMNS
            .iter()
            .map(|c| format!("{} {}", c.name, c.sql_type).trim_end().to_string()),
    );
    defs.push(format!("UNIQUE({})", KEY.name));

    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE} (\n    {}\n)",
        defs.join(",\n    ")
    )
}

/// `INSERT OR REPLACE ...` binding the key and every value column, positionally.
pub fn upsert_row() -> String {
    let names: Vec<&str> = std::iter::once(KEY.name)
        .chain(COLUMNS.iter().map(|c| c.name))
        .collect();
    let params = vec!["?"; names.len()].join(", ");

    format!(
        "INSERT OR REPLACE INTO {TABLE} ({}) VALUES ({params})",
        names.join(", ")
    )
}

/// `SELECT` of every column, key first, in storage order.
pub fn select_all() -> String {
    let names: Vec<&str> = std::iter::once(KEY.name)
        .chain(COLUMNS.iter().map(|c| c.name))
        .collect();
    format!("SELECT {} FROM {TABLE}", names.join(", "))
}

/// Labels of the value columns, in declared order.
pub fn labels() -> Vec<&'static str> {
    COLUMNS.iter().map(|c| c.label).collect()
}

/// Check `found` names exactly the declared value columns, in order.
pub fn check_labels<S: AsRef<str>>(found: &[S]) -> Result<()> {
    let matches = found.len() == COLUMNS.len()
        && found
            .iter()
            .zip(COLUMNS.iter())
            .all(|(f, c)| f.as_ref() == c.label);

    if matches {
        Ok(())
    } else {
        Err(SpiderError::ColumnMismatch {
            expected: labels().into_iter().map(String::from).collect(),
            found: found.iter().map(|f| f.as_ref().to_string()).collect(),
        })
    }
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::METRIC_COLUMNS;

    #[test]
    fn compiled_columns_match_schema() {
        check_labels(&METRIC_COLUMNS).unwrap();
    }

    #[test]
    fn reordered_columns_are_rejected() {
        let mut columns = METRIC_COLUMNS;
        columns.swap(5, 6);
        let err = check_labels(&columns).unwrap_err();
        assert!(matches!(err, SpiderError::ColumnMismatch { .. }));

        assert!(check_labels(&METRIC_COLUMNS[..15]).is_err());
    }

    #[test]
    fn create_table_declares_key_and_untyped_column() {
        let sql = create_table();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS stock_fundamentals"));
        assert!(sql.contains("index_key TEXT PRIMARY KEY,"));
        assert!(sql.contains("EPS_QoQ,"));
        assert!(sql.contains("Insider_own FLOAT,"));
        assert!(sql.contains("UNIQUE(index_key)"));
    }

    #[test]
    fn upsert_binds_every_column() {
        let sql = upsert_row();
        assert!(sql.starts_with("INSERT OR REPLACE INTO stock_fundamentals (index_key, ticker,"));
        assert_eq!(sql.matches('?').count(), 17);
    }
}
