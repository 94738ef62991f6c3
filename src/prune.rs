use std::hash::Hash;

use crate::metric::Metric;
use crate::node::Slot;
use crate::Index;

const CHECK_LIMIT: usize = 10;
const FRESH_DISTANCE_BUDGET: usize = 30;

impl<T, M> Index<T, M>
where
    T: Eq + Hash + Clone,
    M: Metric<T>,
{
    /// alpha-RNG diversification: rewrite `slot`'s neighbor map in place so
    /// it holds at most `M` diverse neighbors, dropping the reverse edge on
    /// whatever gets cut.
    pub(crate) fn prune_node(&mut self, slot: Slot) {
        let m = self.config.m;
        self.scratch.prune_entries.clear();
        self.scratch
            .prune_entries
            .extend(self.nodes[slot as usize].neighbors.iter().copied());

        if self.scratch.prune_entries.len() <= m {
            return;
        }

        self.scratch
            .prune_entries
            .sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

        self.scratch.prune_selected.clear();
        let mut fresh_budget = FRESH_DISTANCE_BUDGET;
        let alpha = self.config.pruning_alpha;

        let entries = self.scratch.prune_entries.clone();
        for &(candidate_slot, candidate_distance) in &entries {
            let check_n = self.scratch.prune_selected.len().min(CHECK_LIMIT);
            let mut rejected = false;
            for i in 0..check_n {
                let existing_slot = self.scratch.prune_selected[i].0;
                let d_ec = match self.cached_or_fresh_distance(existing_slot, candidate_slot, &mut fresh_budget) {
                    Some(d) => d,
                    None => continue,
                };
                if d_ec * alpha < candidate_distance {
                    rejected = true;
                    break;
                }
            }

            if !rejected {
                self.scratch.prune_selected.push((candidate_slot, candidate_distance));
                if self.scratch.prune_selected.len() == m {
                    break;
                }
            }
        }

        if self.scratch.prune_selected.len() < m {
            for &(candidate_slot, candidate_distance) in &entries {
                if self.scratch.prune_selected.len() >= m {
                    break;
                }
                if self.scratch.prune_selected.iter().any(|&(s, _)| s == candidate_slot) {
                    continue;
                }
                self.scratch.prune_selected.push((candidate_slot, candidate_distance));
            }
        }

        self.scratch.new_neighbors.clear();
        self.scratch.new_neighbors.extend(self.scratch.prune_selected.iter().copied());

        for &(neighbor_slot, _) in &entries {
            let kept = self
                .scratch
                .new_neighbors
                .iter()
                .any(|&(s, _)| s == neighbor_slot);
            if !kept {
                self.nodes[neighbor_slot as usize].remove_neighbor(slot);
            }
        }

        self.nodes[slot as usize].neighbors = self.scratch.new_neighbors.clone();
    }

    /// Distance between two neighbor-map entries of `slot`'s node, found
    /// cheaply when possible: cached on `a`, else cached on `b`, else a
    /// fresh metric call charged against `budget`. Returns `None` only when
    /// neither is cached and the budget is exhausted — callers treat that as
    /// "does not disqualify".
    fn cached_or_fresh_distance(&mut self, a: Slot, b: Slot, budget: &mut usize) -> Option<f64> {
        if let Some(d) = self.nodes[a as usize].distance_to(b) {
            return Some(d);
        }
        if let Some(d) = self.nodes[b as usize].distance_to(a) {
            return Some(d);
        }
        if *budget == 0 {
            return None;
        }
        *budget -= 1;
        let d = self
            .metric()
            .distance(&self.nodes[a as usize].value, &self.nodes[b as usize].value);
        Some(d)
    }
}
