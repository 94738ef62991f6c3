//! An in-memory approximate nearest-neighbor index over an arbitrary value
//! type `T`, backed by a bounded-degree navigable small-world (NSW) graph.
//!
//! The index answers two questions: which stored value is closest to a
//! query, and which `k` stored values are closest, in ascending distance
//! order. Insertions, removals, and queries interleave freely; the graph
//! stays usable at any point during a build.
//!
//! ```
//! use nsw_index::Index;
//!
//! let mut index = Index::new(|a: &[f32; 2], b: &[f32; 2]| {
//!     ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt() as f64
//! });
//!
//! index.add([0.0, 0.0]);
//! index.add([1.0, 1.0]);
//! index.add([5.0, 5.0]);
//!
//! let nearest = index.find_neighbors(&[0.1, 0.1], 1).unwrap();
//! assert_eq!(nearest.closest(), Some(&[0.0, 0.0]));
//! ```
//!
//! Quality is tuned against the RNG-pruning ("Vamana"/DiskANN-style) rule;
//! see [`Config::pruning_alpha`] for the knob the test suite pins.

use std::collections::HashMap;
use std::hash::Hash;

mod config;
mod error;
mod metric;
mod node;
mod prune;
mod remove;
mod result;
mod search;

pub use config::Config;
pub use error::Error;
pub use metric::Metric;
pub use result::Neighbors;

use node::{Node, Slot};
use search::{Candidate, Scratch};

/// The in-memory ANN index.
///
/// `T` must be `Eq + Hash + Clone`: identity is established by the value's
/// own equality, and the arena keeps one owned copy per node while each edge
/// and result stores a clone. `M` supplies the distance function.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Index<T, M> {
    nodes: Vec<Node<T>>,
    slots: HashMap<T, Slot>,
    #[cfg_attr(feature = "serde", serde(skip))]
    metric: Option<M>,
    config: Config,
    frozen: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    scratch: Scratch,
}

impl<T, M> Index<T, M>
where
    T: Eq + Hash + Clone,
    M: Metric<T>,
{
    /// A new, empty index with default configuration (see [`Config`]).
    pub fn new(metric: M) -> Self {
        Self::with_config(metric, Config::default())
    }

    /// A new, empty index with explicit tuning parameters.
    pub fn with_config(metric: M, config: Config) -> Self {
        Self {
            nodes: Vec::new(),
            slots: HashMap::new(),
            metric: Some(metric),
            config,
            frozen: false,
            scratch: Scratch::new(),
        }
    }

    /// The active metric. Panics if the index was deserialized and no metric
    /// has been attached yet — call [`Index::attach_metric`] first.
    fn metric(&self) -> &M {
        self.metric
            .as_ref()
            .expect("no metric attached; call Index::attach_metric after deserializing")
    }

    /// Current tuning parameters.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the tuning parameters. Fails once the index holds any value:
    /// parameters must be set before the first insert to take global
    /// effect, and that's enforced here rather than merely documented.
    pub fn set_config(&mut self, config: Config) -> Result<(), Error> {
        if self.frozen {
            return Err(Error::ConfigFrozen);
        }
        self.config = config;
        Ok(())
    }

    /// Re-attach a (possibly non-serializable) metric, e.g. after
    /// deserializing an index whose metric isn't carried in the persisted
    /// form. Required before any of `add`/`remove`/`find_neighbors` can be
    /// called on a freshly deserialized index.
    pub fn attach_metric(&mut self, metric: M) {
        self.metric = Some(metric);
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `value` is currently stored.
    pub fn contains(&self, value: &T) -> bool {
        self.slots.contains_key(value)
    }

    /// Iterate over all stored values, in arena order (unspecified but
    /// stable between mutations).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter().map(|node| &node.value)
    }

    /// Insert `value`. Returns `true` if it was newly stored, `false` if an
    /// equal value (per `T::eq`) was already present — the graph is
    /// unchanged in that case.
    pub fn add(&mut self, value: T) -> bool {
        if self.slots.contains_key(&value) {
            return false;
        }
        self.frozen = true;

        if self.nodes.is_empty() {
            self.nodes.push(Node::new(value.clone()));
            self.slots.insert(value, 0);
            tracing::debug!(slot = 0, "inserted first node");
            return true;
        }

        let k_prime = (self.config.m + 3).min(self.nodes.len());
        let construction_limit = ((self.config.search_set_size as f64)
            * self.config.adaptive_step_factor
            * self.config.construction_factor)
            .floor() as usize;

        let candidates = self.run_search(&value, k_prime, construction_limit);
        if candidates.len() >= construction_limit.min(self.nodes.len()) {
            tracing::warn!(
                construction_limit,
                "insertion search hit its distance-call budget; consider raising M or constructionFactor"
            );
        }

        let new_slot = self.nodes.len() as Slot;
        self.nodes.push(Node::new(value.clone()));
        self.slots.insert(value, new_slot);

        let m = self.config.m;
        for (i, candidate) in candidates.iter().enumerate() {
            let distance = candidate.distance.into_inner();
            self.nodes[new_slot as usize].add_or_update(candidate.slot, distance);
            self.nodes[candidate.slot as usize].add_or_update(new_slot, distance);
            if i < m {
                self.prune_node(candidate.slot);
            }
        }

        self.prune_node(new_slot);
        tracing::debug!(slot = new_slot, wired = candidates.len(), "inserted node");
        true
    }

    /// Remove `value`, healing its former neighbors' connectivity and
    /// re-pruning them. Returns `false` if it wasn't stored.
    pub fn remove(&mut self, value: &T) -> bool {
        let removed = self.remove_impl(value);
        if removed {
            tracing::debug!("removed node");
        }
        removed
    }

    /// The `k` stored values nearest to `value`, in ascending distance
    /// order. `k` must be `>= 1`. An empty index yields an empty result,
    /// not an error.
    pub fn find_neighbors(&mut self, value: &T, k: usize) -> Result<Neighbors<T>, Error> {
        if k < 1 {
            return Err(Error::InvalidK(k));
        }
        if self.nodes.is_empty() {
            return Ok(Neighbors::new(Vec::new()));
        }

        // Exact-match short-circuit: bypass the graph walk when the query
        // value is already stored.
        if let Some(&slot) = self.slots.get(value) {
            let mut items: Vec<(Slot, f64)> =
                Vec::with_capacity(self.nodes[slot as usize].neighbors.len() + 1);
            items.push((slot, 0.0));
            items.extend(self.nodes[slot as usize].neighbors.iter().copied());
            items.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
            items.truncate(k);

            let values = items
                .into_iter()
                .map(|(s, d)| (self.nodes[s as usize].value.clone(), d))
                .collect();
            return Ok(Neighbors::new(values));
        }

        let search_limit = (((self.config.search_set_size as f64)
            * self.config.adaptive_step_factor)
            .floor() as usize)
            .max(1);
        let candidates: Vec<Candidate> = self.run_search(value, k, search_limit);

        if candidates.len() < k.min(self.nodes.len()) {
            tracing::trace!(
                found = candidates.len(),
                requested = k,
                "search returned fewer than k candidates"
            );
        }

        let values = candidates
            .into_iter()
            .map(|c| (self.nodes[c.slot as usize].value.clone(), c.distance.into_inner()))
            .collect();
        Ok(Neighbors::new(values))
    }

    /// Convenience for `find_neighbors(value, 1)`, returning just the
    /// closest (value, distance) pair.
    pub fn find_nearest(&mut self, value: &T) -> Result<Option<(T, f64)>, Error> {
        Ok(self.find_neighbors(value, 1)?.into_inner().into_iter().next())
    }
}
