mod cli;
mod spider;

// remote imports
use clap::Parser;
use cli::{Cli, Commands, TraceLevel};
use fundump_spider::config::SpiderConfig;
use tracing::{subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// preprocess the trace level
fn preprocess(trace_level: Level) {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber).expect("Set subscriber");
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // set the trace level
    if let Some(trace_level) = cli.trace {
        preprocess(match trace_level {
            TraceLevel::DEBUG => Level::DEBUG,
            TraceLevel::ERROR => Level::ERROR,
            TraceLevel::INFO => Level::INFO,
            TraceLevel::TRACE => Level::TRACE,
            TraceLevel::WARN => Level::WARN,
        });
    }
    trace!("command line input recorded: {cli:?}");

    // if no trace level provided, use tui
    let tui = cli.trace.is_none();
    let config = SpiderConfig::default();

    match cli.command.unwrap_or(Commands::Run) {
        // `fundump [run]`: scrape, store, export
        Commands::Run => spider::run(&config, tui).await?,

        // `fundump export`: re-export what is already stored
        Commands::Export => spider::export(&config, tui).await?,
    }

    Ok(())
}
