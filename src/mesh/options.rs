//! Generation options.

use crate::algo::recombine::RecombineOptions;

/// Options controlling mesh generation.
#[derive(Debug, Clone)]
pub struct MeshOptions {
    /// Highest entity dimension to mesh, 0 to 3 (default: 3).
    pub dimension: usize,

    /// Target element size for edges that have neither a subdivision count
    /// nor a size on their endpoints.
    pub characteristic_length: f64,

    /// Recombination parameters for free faces marked for recombination.
    pub recombine: RecombineOptions,

    /// Whether to interpolate block lattices in parallel (default: true).
    pub parallel: bool,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            dimension: 3,
            characteristic_length: 1.0,
            recombine: RecombineOptions::default(),
            parallel: true,
        }
    }
}

impl MeshOptions {
    /// Mesh entities up to `dimension` only.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the fallback element size.
    pub fn with_characteristic_length(mut self, length: f64) -> Self {
        self.characteristic_length = length;
        self
    }

    /// Set the recombination parameters.
    pub fn with_recombine(mut self, recombine: RecombineOptions) -> Self {
        self.recombine = recombine;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
