//! One-shot compilation of authored brushes into a BSP tree.

use std::sync::Arc;

use tracing::debug;

use crate::{
    flatten_tree, BspTree, BuildStats, CompileBrush, CompileConfig, CompileError, FaceMap,
    FlattenedTree, MapBrush, PlaneSet, Result, TreeBuilder,
};

/// Runs the brush compiler with a fixed configuration.
///
/// Every call to [`compile`](Self::compile) starts from a fresh
/// [`PlaneSet`], so plane numbers never leak between maps.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompileConfig,
}

/// Everything a compile run produces.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub planes: PlaneSet,
    /// The adapted input brushes, in input order.
    pub brushes: Vec<Arc<CompileBrush>>,
    pub tree: BspTree,
    pub stats: BuildStats,
}

impl Compiler {
    pub fn new(config: CompileConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Adapts `map_brushes` and builds their tree.
    ///
    /// Fails on the first brush the adapter rejects.
    #[tracing::instrument(level = "debug", skip_all, fields(brushes = map_brushes.len()))]
    pub fn compile(&self, map_brushes: &[MapBrush]) -> Result<Compilation> {
        let mut planes =
            PlaneSet::with_epsilons(self.config.normal_epsilon, self.config.dist_epsilon);

        let brushes = map_brushes
            .iter()
            .enumerate()
            .map(|(index, map_brush)| {
                CompileBrush::from_map_brush(map_brush, index, &mut planes)
                    .map(Arc::new)
                    .map_err(|source| CompileError::Brush { index, source })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(planes = planes.len(), "adapted brushes");

        let (tree, stats) = TreeBuilder::with_selector(self.config.selector.clone())
            .max_depth(self.config.max_depth)
            .epsilon(self.config.selector.epsilon)
            .build_with_stats(brushes.clone(), &planes);

        Ok(Compilation {
            planes,
            brushes,
            tree,
            stats,
        })
    }
}

impl Compilation {
    /// Flattens the tree with the faces the surface pass attached to it.
    pub fn flatten<'a>(&self, faces: &'a FaceMap) -> FlattenedTree<'a> {
        flatten_tree(&self.tree, faces)
    }
}
