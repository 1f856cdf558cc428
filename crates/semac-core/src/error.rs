use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures raised by the loader, the model facade and the emitter.
/// There are no path-local errors: absorbing states and residual
/// probability are normal simulation outcomes.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("cannot open transition file {path}: {source}")]
    FileUnopenable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed transition header: {detail}")]
    MalformedHeader { detail: String },

    #[error("data row {row} has {found} fields, expected {expected}")]
    MalformedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("unknown duration type {token:?} in column {column}")]
    UnknownDurationType { token: String, column: usize },

    #[error("non-numeric probability {token:?} at row {row}, column {column}")]
    NonNumericProbability {
        token: String,
        row: usize,
        column: usize,
    },

    #[error("negative probability {value} at row {row}, column {column}")]
    NegativeProbability {
        value: f64,
        row: usize,
        column: usize,
    },

    #[error("state name {name:?} is reserved for the aggregate output column")]
    ReservedStateName { name: String },

    #[error("state {name:?} mixes duration types across its outgoing transitions")]
    MixedDurationTypes { name: String },

    #[error("unknown state {name:?}")]
    UnknownState { name: String },

    #[error("lookup table not built; call build_lut first")]
    LutNotBuilt,

    #[error("batch not initialized; call initialize_batch first")]
    BatchNotInitialized,

    #[error("cannot create output file {path}: {source}")]
    OutputOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed writing output file {path}: {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
