pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod finviz;
pub mod instrument;
pub mod schema;
pub mod store;
pub mod table;
pub mod tui;

pub use error::SpiderError;

/// Library-wide result type.
pub type Result<T> = std::result::Result<T, SpiderError>;

/// Shortcut for required API elements.
pub(crate) mod http {
    pub(crate) use reqwest::Client as HttpClient;
    pub(crate) use reqwest::StatusCode;
}

/// Format the time elapsed since `time`, for trace & debug logs.
pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:.3}s", time.elapsed().as_secs_f64())
}
