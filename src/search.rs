use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::hash::Hash;

use ordered_float::OrderedFloat;

use crate::metric::Metric;
use crate::node::Slot;
use crate::Index;

/// A transient (value, distance) pair produced while walking the graph.
///
/// Ordered by distance first so it can seed both the candidate min-heap
/// (via `Reverse`) and the bounded result max-heap directly; slot breaks
/// ties deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Candidate {
    pub(crate) distance: OrderedFloat<f64>,
    pub(crate) slot: Slot,
}

/// Dense, generation-stamped visited set indexed by slot.
///
/// Avoids both hashing (a `HashSet<Slot>` would do) and an O(n) clear on
/// every search: bumping `generation` invalidates all previous stamps in
/// O(1), at the cost of one `u32` per arena slot.
pub(crate) struct Visited {
    stamps: Vec<u32>,
    generation: u32,
    count: usize,
}

impl Visited {
    pub(crate) fn new() -> Self {
        Self {
            stamps: Vec::new(),
            generation: 0,
            count: 0,
        }
    }

    /// Prepare for a fresh search over an arena of `len` slots.
    pub(crate) fn reset(&mut self, len: usize) {
        if self.stamps.len() < len {
            self.stamps.resize(len, 0);
        }
        self.count = 0;
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.stamps.iter_mut().for_each(|s| *s = 0);
            self.generation = 1;
        }
    }

    /// Mark `slot` visited. Returns `true` if it was not already visited.
    pub(crate) fn insert(&mut self, slot: Slot) -> bool {
        let stamp = &mut self.stamps[slot as usize];
        if *stamp == self.generation {
            false
        } else {
            *stamp = self.generation;
            self.count += 1;
            true
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }
}

/// Scratch containers reused across `add`/`remove`/`find_neighbors` calls to
/// keep per-call allocation close to O(result size).
pub(crate) struct Scratch {
    pub(crate) visited: Visited,
    pub(crate) candidates: BinaryHeap<Reverse<Candidate>>,
    pub(crate) results: BinaryHeap<Candidate>,
    pub(crate) result_list: Vec<Candidate>,
    pub(crate) prune_entries: Vec<(Slot, f64)>,
    pub(crate) prune_selected: Vec<(Slot, f64)>,
    pub(crate) new_neighbors: Vec<(Slot, f64)>,
}

impl Scratch {
    pub(crate) fn new() -> Self {
        Self {
            visited: Visited::new(),
            candidates: BinaryHeap::new(),
            results: BinaryHeap::new(),
            result_list: Vec::new(),
            prune_entries: Vec::new(),
            prune_selected: Vec::new(),
            new_neighbors: Vec::new(),
        }
    }
}

/// Push `candidate` into the bounded result max-heap, evicting the worst
/// entry if it grows past `ef`.
fn push_result(results: &mut BinaryHeap<Candidate>, candidate: Candidate, ef: usize) {
    results.push(candidate);
    if results.len() > ef {
        results.pop();
    }
}

fn worst_distance(results: &BinaryHeap<Candidate>, ef: usize) -> OrderedFloat<f64> {
    if results.len() < ef {
        OrderedFloat(f64::INFINITY)
    } else {
        results.peek().map(|c| c.distance).unwrap_or(OrderedFloat(f64::INFINITY))
    }
}

impl<T, M> Index<T, M>
where
    T: Eq + Hash + Clone,
    M: Metric<T>,
{
    /// Evenly spaced, deterministic entry point slots for a walk budgeted at
    /// `search_limit` distance evaluations.
    pub(crate) fn entry_points(&self, search_limit: usize) -> Vec<Slot> {
        let n = self.nodes.len();
        if n == 0 {
            return Vec::new();
        }

        let auto = ((n as f64).sqrt().floor() as usize).max(3);
        let mut ep_count = self.config.num_entry_points.unwrap_or(auto);
        ep_count = ep_count.min((search_limit / 6).max(1)).min(n).max(1);

        let step = (n / ep_count).max(1);
        (0..ep_count).map(|i| ((i * step) % n) as Slot).collect()
    }

    /// Best-first search for the `k` nearest stored values to `query`,
    /// budgeted at `search_limit` distance evaluations (visited-slot count).
    ///
    /// Returns candidates in ascending distance order, already truncated to
    /// `k`. Does not perform the exact-match short-circuit — callers check
    /// that separately since it needs the query's own slot, not just its
    /// value.
    pub(crate) fn run_search(&mut self, query: &T, k: usize, search_limit: usize) -> Vec<Candidate> {
        self.scratch.candidates.clear();
        self.scratch.results.clear();
        self.scratch.result_list.clear();

        if self.nodes.is_empty() {
            return Vec::new();
        }

        self.scratch.visited.reset(self.nodes.len());
        let ef = k.max(self.config.search_set_size);

        for ep in self.entry_points(search_limit) {
            if self.scratch.visited.insert(ep) {
                let d = self.metric().distance(query, &self.nodes[ep as usize].value);
                let candidate = Candidate {
                    distance: OrderedFloat(d),
                    slot: ep,
                };
                self.scratch.candidates.push(Reverse(candidate));
                push_result(&mut self.scratch.results, candidate, ef);
            }
        }

        let steps_cap: Option<usize> = match self.config.search_max_steps {
            0 => Some(0),
            n if n < 0 => None,
            n => Some(n as usize),
        };

        if steps_cap != Some(0) {
            let mut steps = 0usize;
            let mut worst = worst_distance(&self.scratch.results, ef);

            loop {
                if let Some(cap) = steps_cap {
                    if steps >= cap {
                        break;
                    }
                }
                if self.scratch.visited.len() >= search_limit {
                    break;
                }
                let Some(Reverse(candidate)) = self.scratch.candidates.pop() else {
                    break;
                };
                if candidate.distance > worst {
                    break;
                }
                steps += 1;

                let neighbors = self.nodes[candidate.slot as usize].neighbors.clone();
                for (nslot, _cached) in neighbors {
                    if !self.scratch.visited.insert(nslot) {
                        continue;
                    }

                    let d = self.metric().distance(query, &self.nodes[nslot as usize].value);
                    let distance = OrderedFloat(d);
                    if distance > worst {
                        continue;
                    }

                    let candidate = Candidate {
                        distance,
                        slot: nslot,
                    };
                    push_result(&mut self.scratch.results, candidate, ef);
                    worst = worst_distance(&self.scratch.results, ef);

                    if distance < worst {
                        self.scratch.candidates.push(Reverse(candidate));
                    }
                }
            }
        }

        self.scratch.result_list = self.scratch.results.clone().into_sorted_vec();

        if steps_cap != Some(0) {
            self.refine(query);
        }

        self.scratch.result_list.truncate(k);
        self.scratch.result_list.clone()
    }

    /// Expand the unvisited neighbors of the top 3 results with a shared
    /// budget of 10 fresh distance computations, then re-sort.
    fn refine(&mut self, query: &T) {
        let mut budget = 10usize;
        let top_n = self.scratch.result_list.len().min(3);

        for i in 0..top_n {
            if budget == 0 {
                break;
            }
            let slot = self.scratch.result_list[i].slot;
            let neighbors = self.nodes[slot as usize].neighbors.clone();
            for (nslot, _cached) in neighbors {
                if budget == 0 {
                    break;
                }
                if !self.scratch.visited.insert(nslot) {
                    continue;
                }
                let d = self.metric().distance(query, &self.nodes[nslot as usize].value);
                budget -= 1;
                self.scratch.result_list.push(Candidate {
                    distance: OrderedFloat(d),
                    slot: nslot,
                });
            }
        }

        self.scratch
            .result_list
            .sort_by(|a, b| a.distance.cmp(&b.distance));
    }
}
