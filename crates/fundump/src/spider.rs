use colored::Colorize;
use fundump_spider::config::{SpiderConfig, METRIC_COLUMNS, TRACKED_INSTRUMENTS};
use fundump_spider::finviz::Fetcher;
use fundump_spider::instrument::Registry;
use fundump_spider::tui::Progress;
use fundump_spider::{export as csv, store, table};
use tracing::{error, info, trace};

/// Register the tracked stocks, scrape them, store the rows and export the CSV.
pub(crate) async fn run(config: &SpiderConfig, tui: bool) -> anyhow::Result<()> {
    if tui {
        println!("Starting Stock Fundamentals Database program....");
    }
    let time = std::time::Instant::now();

    // 1. instruments; an ineligible classification only drops that stock
    let mut registry = Registry::new();
    for (symbol, sector, market_cap, kind) in TRACKED_INSTRUMENTS {
        if let Err(err) = registry.register(symbol, sector, market_cap, kind) {
            if tui {
                println!("{} {err}", "skipping".yellow());
            }
        }
    }
    trace!("{} instruments registered", registry.len());

    // 2. fetch & tabulate
    let progress = if tui {
        Progress::bars(registry.len())?
    } else {
        Progress::hidden()
    };
    let fetcher = Fetcher::new(config)?;
    let table =
        table::build_table(&fetcher, registry.instruments(), &METRIC_COLUMNS, &progress).await;
    progress.finish();
    let table = table?;

    if tui {
        for instrument in registry.iter() {
            let prefix = format!("{} ", instrument.symbol());
            if !table.rows().iter().any(|row| row.key().starts_with(&prefix)) {
                println!("{} {}", instrument.symbol(), "not found".red());
            }
        }
    }

    // 3. persist; a store failure is logged, and the export still runs
    match store::persist(&config.database_path, &table).await {
        Ok(written) => {
            if tui {
                println!("{written} rows stored ... {}", "done".green());
            }
        }
        Err(err) => {
            error!("failed to persist fundamentals, error({err})");
            if tui {
                println!("{} {err}", "storing failed:".red());
            }
        }
    }

    // 4. export
    export(config, tui).await?;

    info!(
        "fundump finished collecting data, time elapsed: {:?}",
        time.elapsed()
    );

    Ok(())
}

/// Write the stored history to the configured CSV file.
pub(crate) async fn export(config: &SpiderConfig, tui: bool) -> anyhow::Result<()> {
    let path = config.csv_path();
    let written = csv::export(&config.database_path, &METRIC_COLUMNS, &path)
        .await
        .map_err(|err| {
            error!("failed to export {path:?}, error({err})");
            err
        })?;

    if tui {
        println!(
            "{written} rows exported to {} ... {}",
            path.display(),
            "done".green()
        );
    }

    Ok(())
}
