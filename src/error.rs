use thiserror::Error;

/// Everything that can abort a scrape run. None of these are recovered.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The table locator matched but produced no data rows (page layout changed upstream).
    #[error("no rows extracted from the {table} table")]
    EmptyExtraction { table: &'static str },

    /// A free-text reference did not match any record in its target collection.
    #[error("{kind} `{name}` not found")]
    UnresolvedReference { kind: &'static str, name: String },

    #[error("failed to fetch {url}: {cause:#}")]
    Fetch { url: String, cause: anyhow::Error },

    #[error("{table} row {row}: no cell for column `{column}`")]
    MissingCell {
        table: &'static str,
        row: usize,
        column: &'static str,
    },

    #[error("{table} row {row}: column `{column}` is not a number: {text:?}")]
    InvalidNumber {
        table: &'static str,
        row: usize,
        column: &'static str,
        text: String,
    },

    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
}
