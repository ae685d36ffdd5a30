use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Sets the level of tracing.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Scrape Finviz fundamentals for the tracked stocks, store them, and export the CSV.
    ///
    /// This is the default when no command is given.
    Run,

    /// Export the stored fundamentals to CSV without scraping.
    Export,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_command_means_full_run() {
        let cli = Cli::parse_from(["fundump"]);
        assert_eq!(cli.command, None);
        assert_eq!(cli.trace, None);
    }

    #[test]
    fn trace_level_is_global() {
        let cli = Cli::parse_from(["fundump", "export", "--trace", "DEBUG"]);
        assert_eq!(cli.command, Some(Commands::Export));
        assert_eq!(cli.trace, Some(TraceLevel::DEBUG));
    }
}
