use crate::error::Error;

/// Tuning parameters for an [`crate::Index`].
///
/// All of these must be set before the first insert to take global effect;
/// an index rejects further `Config` changes once it holds any values (see
/// [`crate::Index::set_config`]).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    pub(crate) m: usize,
    pub(crate) search_set_size: usize,
    pub(crate) search_max_steps: i64,
    pub(crate) adaptive_step_factor: f64,
    pub(crate) num_entry_points: Option<usize>,
    pub(crate) construction_factor: f64,
    pub(crate) pruning_alpha: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            m: 16,
            search_set_size: 100,
            search_max_steps: -1,
            adaptive_step_factor: 1.5,
            num_entry_points: None,
            construction_factor: 4.0,
            pruning_alpha: 1.0,
        }
    }
}

impl Config {
    /// Max degree per node (`neighbourhoodSize`, `M`). Must be `>= 1`.
    pub fn neighbourhood_size(mut self, m: usize) -> Result<Self, Error> {
        if m < 1 {
            return Err(Error::InvalidConfig("neighbourhoodSize must be >= 1"));
        }
        self.m = m;
        Ok(self)
    }

    /// `ef` floor: minimum result-heap capacity during search. Must be `>= 1`.
    pub fn search_set_size(mut self, size: usize) -> Result<Self, Error> {
        if size < 1 {
            return Err(Error::InvalidConfig("searchSetSize must be >= 1"));
        }
        self.search_set_size = size;
        Ok(self)
    }

    /// Cap on graph-walk steps: `-1` unbounded, `0` entry-points-only (skips
    /// the refinement pass too), `> 0` an explicit step limit.
    pub fn search_max_steps(mut self, steps: i64) -> Result<Self, Error> {
        if steps < -1 {
            return Err(Error::InvalidConfig("searchMaxSteps must be >= -1"));
        }
        self.search_max_steps = steps;
        Ok(self)
    }

    /// Multiplier on `searchSetSize` for the runtime distance-call budget.
    /// Must be `> 0`.
    pub fn adaptive_step_factor(mut self, factor: f64) -> Result<Self, Error> {
        if !(factor > 0.0) {
            return Err(Error::InvalidConfig("adaptiveStepFactor must be > 0"));
        }
        self.adaptive_step_factor = factor;
        Ok(self)
    }

    /// Number of entry points to seed search with. `None` selects
    /// `max(3, floor(sqrt(n)))` automatically; `Some(k)` requires `k >= 1`.
    pub fn num_entry_points(mut self, n: Option<usize>) -> Result<Self, Error> {
        if let Some(0) = n {
            return Err(Error::InvalidConfig("numEntryPoints must be -1 or >= 1"));
        }
        self.num_entry_points = n;
        Ok(self)
    }

    /// Extra budget multiplier applied during insert-time search. Must be `>= 1.0`.
    pub fn construction_factor(mut self, factor: f64) -> Result<Self, Error> {
        if factor < 1.0 {
            return Err(Error::InvalidConfig("constructionFactor must be >= 1.0"));
        }
        self.construction_factor = factor;
        Ok(self)
    }

    /// RNG-rule relaxation for pruning (`alpha`). Larger keeps more diverse,
    /// longer-range edges. Must be `> 0`.
    pub fn pruning_alpha(mut self, alpha: f64) -> Result<Self, Error> {
        if !(alpha > 0.0) {
            return Err(Error::InvalidConfig("pruningAlpha must be > 0"));
        }
        self.pruning_alpha = alpha;
        Ok(self)
    }
}
