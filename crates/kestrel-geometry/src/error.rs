use thiserror::Error;

/// Errors raised by the geometry routines.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    /// The two trajectories handed to the aligner differ in length.
    #[error("Trajectory lengths differ: T_W_A has {a} poses, T_W_B has {b}")]
    SequenceLengthMismatch {
        /// Number of poses in the first trajectory.
        a: usize,
        /// Number of poses in the second trajectory.
        b: usize,
    },

    /// A scale was requested from an empty set of residuals.
    #[error("Cannot estimate a scale from an empty set of residuals")]
    DegenerateScale,

    /// A parameter is not finite or not strictly positive.
    #[error("Parameter {name} must be finite and positive, got {value}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Value that was rejected.
        value: f64,
    },
}
