use thiserror::Error;

/// Everything that can go wrong before a loss/gradient is produced.
///
/// All checks run up front, so a call either returns a complete
/// `(loss, dW)` pair or one of these and nothing else.
#[derive(Debug, Error)]
pub enum SoftmaxError {
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("empty batch: at least one example is required to average the loss")]
    EmptyBatch,

    #[error("weight matrix has no classes (zero columns)")]
    NoClasses,

    #[error("label {label} at example {index} is outside [0, {classes})")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        classes: usize,
    },

    #[error("regularization strength must be a non-negative number, got {0}")]
    InvalidRegularization(f64),

    #[error("row {row} has {len} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SoftmaxError>;
