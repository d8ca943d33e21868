//! Errors surfaced by the lowering pipeline.

use opgen_common::ModelError;
use thiserror::Error;

/// Failures while lowering an operation.
#[derive(Debug, Error)]
pub enum LoweringError {
    /// The description model handed to the pipeline is malformed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A paged operation returns a sequence with no page container bound to it.
    #[error(
        "Operation '{operation}' is paged but its response sequence has no page implementation bound."
    )]
    MissingPageImplementation {
        /// Declared operation name.
        operation: String,
    },

    /// An operation index outside the group was requested.
    #[error("Group '{group}' has no operation at index {index}.")]
    UnknownOperation {
        /// Group name.
        group: String,
        /// Requested index.
        index: usize,
    },

    /// An internal invariant was violated; indicates a defect in the pipeline.
    #[error("Invariant violated while lowering '{operation}': {invariant}")]
    Invariant {
        /// Declared operation name.
        operation: String,
        /// Which invariant failed.
        invariant: &'static str,
    },
}
