use crate::schema::{self, KEY_LABEL};
use crate::store::Store;
use crate::Result;
use csv::WriterBuilder;
use std::path::Path;
use tracing::{error, info, trace};

/// Dump the whole fundamentals table at `db_path` to a CSV file at `output_path`.
///
/// `columns` label the value columns and must match the schema, in order; the composite
/// key is written first under [KEY_LABEL]. An existing file is overwritten. Returns the
/// number of records written (the header excluded).
pub async fn export<S: AsRef<str>>(
    db_path: &Path,
    columns: &[S],
    output_path: &Path,
) -> Result<usize> {
    let time = std::time::Instant::now();
    schema::check_labels(columns).map_err(|err| {
        error!("refusing to export, error({err})");
        err
    })?;

    let mut store = Store::open(db_path).await?;
    let rows = match store.ensure_schema().await {
        Ok(()) => store.read_all().await,
        Err(err) => Err(err),
    };
    if let Err(err) = store.close().await {
        error!("failed to close store, error({err})");
    }
    let rows = rows?;

    if let Some(dir) = output_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    trace!("writing {} rows to {output_path:?}", rows.len());
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(output_path)
        .map_err(|err| {
            error!("failed to create {output_path:?}, error({err})");
            err
        })?;

    let mut header = vec![KEY_LABEL];
    header.extend(columns.iter().map(|c| c.as_ref()));
    writer.write_record(&header)?;

    for row in &rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;

    info!(
        "{} rows exported to {output_path:?}. {}",
        rows.len(),
        crate::time_elapsed(time)
    );
    Ok(rows.len())
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
