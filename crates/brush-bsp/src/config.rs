//! Compile configuration.

use crate::{ScoredSelector, DIST_EPSILON, NORMAL_EPSILON};

/// Default recursion limit of the tree builder.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Tunables for one compile run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileConfig {
    /// Depth at which the builder stops splitting and emits a leaf holding
    /// every remaining brush.
    pub max_depth: usize,
    /// Split plane scoring.
    pub selector: ScoredSelector,
    /// Normal tolerance of the plane registry.
    pub normal_epsilon: f64,
    /// Distance tolerance of the plane registry.
    pub dist_epsilon: f64,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            selector: ScoredSelector::default(),
            normal_epsilon: NORMAL_EPSILON,
            dist_epsilon: DIST_EPSILON,
        }
    }
}
