//! Error types for brush compilation.

use thiserror::Error;

/// Reasons an authored brush cannot enter the compiler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrushError {
    /// The brush has no sides at all
    #[error("brush has no sides")]
    NoSides,

    /// A side normal has zero length
    #[error("side {side} has a zero-length normal")]
    DegenerateNormal { side: usize },

    /// A side plane contains NaN or infinite values
    #[error("side {side} has a non-finite plane")]
    NonFinitePlane { side: usize },

    /// The half-spaces do not enclose any volume
    #[error("brush encloses no volume")]
    Empty,

    /// The half-spaces leave the brush open towards the world bounds
    #[error("brush is not closed (bounds {mins:?} .. {maxs:?})")]
    Unbounded { mins: [f64; 3], maxs: [f64; 3] },
}

/// Compile-level error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// An input brush was rejected by the adapter
    #[error("brush {index}: {source}")]
    Brush {
        index: usize,
        #[source]
        source: BrushError,
    },
}

/// Result type alias using [`CompileError`].
pub type Result<T> = std::result::Result<T, CompileError>;
