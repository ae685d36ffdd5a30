use thiserror::Error;

/// Everything that can go wrong between fetching a quote page and writing the CSV.
#[derive(Debug, Error)]
pub enum SpiderError {
    /// A classification value outside of its closed set.
    #[error("not eligible {kind}: {value}")]
    Validation { kind: &'static str, value: String },

    /// The quote page, or a field on it, does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Column labels disagree with the declared table schema.
    #[error("column mismatch, expected {expected:?}, found {found:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("store error({0})")]
    Store(#[from] sqlx::Error),

    #[error("http error({0})")]
    Http(#[from] reqwest::Error),

    #[error("io error({0})")]
    Io(#[from] std::io::Error),

    #[error("csv error({0})")]
    Csv(#[from] csv::Error),
}

impl SpiderError {
    pub(crate) fn validation(kind: &'static str, value: &str) -> Self {
        SpiderError::Validation {
            kind,
            value: value.to_string(),
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        SpiderError::NotFound(what.into())
    }

    /// Recoverable per instrument; the batch carries on without a row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SpiderError::NotFound(_))
    }
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_names_the_value() {
        let err = SpiderError::validation("sector", "crypto");
        assert_eq!(err.to_string(), "not eligible sector: crypto");
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_is_recoverable() {
        let err = SpiderError::not_found("field \"P/B\"");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "field \"P/B\" not found");
    }
}
