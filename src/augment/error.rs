/// Errors raised while augmenting a datatable with annotation layers.
#[derive(Debug, thiserror::Error)]
pub enum AugmentError {
    /// Augmentation is switched off in config but augment fields were supplied.
    #[error("visualization augmentation is disabled")]
    Disabled,

    /// More annotation layers than the configured limit.
    #[error("{count} annotation layers exceed the limit of {max}")]
    TooManyLayers { count: usize, max: usize },

    /// The `augmentVisFields` argument was not valid JSON for the expected shape.
    #[error("invalid augment fields: {0}")]
    InvalidAugmentFields(#[from] serde_json::Error),

    /// Rows need binning but the table declares no x-axis column.
    #[error("table has rows but no columns; cannot locate the x-axis")]
    MissingAxisColumn,

    /// An x-axis cell is missing or cannot be read as a time.
    #[error("row {row}: value in x-axis column `{column}` is not a number or timestamp")]
    InvalidAxisValue { row: usize, column: String },

    /// The x-axis decreases at `row` (only reported under strict axis checking).
    #[error("row {row}: x-axis column `{column}` is not sorted ascending")]
    UnsortedAxis { row: usize, column: String },
}
