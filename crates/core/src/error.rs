use thiserror::Error;

/// Failures surfaced by the aggregation and segmentation stages.
///
/// Row indices are zero-based positions in the input row set.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RfmError {
    #[error("Missing field `{field}` in row {row}")]
    MissingField { field: &'static str, row: usize },

    #[error("Malformed timestamp {value:?} in row {row}")]
    MalformedTimestamp { value: String, row: usize },

    #[error("Invalid price {value:?} in row {row}")]
    InvalidPrice { value: String, row: usize },

    #[error("Cannot rank an empty customer population")]
    EmptyPopulation,
}

pub type Result<T> = std::result::Result<T, RfmError>;
