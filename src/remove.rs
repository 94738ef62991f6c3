use std::hash::Hash;

use crate::metric::Metric;
use crate::node::{Node, Slot};
use crate::Index;

impl<T, M> Index<T, M>
where
    T: Eq + Hash + Clone,
    M: Metric<T>,
{
    /// Remove the value at `slot` from the arena, swapping the last slot
    /// into its place (invariant 3: slots stay contiguous `[0, size)`).
    ///
    /// Every other node's neighbor list only ever references the removed
    /// node's old slot through the removed node's own neighbor set — that's
    /// exactly the symmetry invariant (1). So fixing up back-references for
    /// the moved node costs O(M) rather than O(n).
    pub(crate) fn remove_slot(&mut self, slot: Slot) -> Node<T> {
        let last = (self.nodes.len() - 1) as Slot;
        self.nodes.swap(slot as usize, last as usize);
        let removed = self.nodes.pop().expect("slot existed, arena non-empty");

        if slot != last {
            let moved_value = self.nodes[slot as usize].value.clone();
            self.slots.insert(moved_value, slot);

            let moved_neighbors: Vec<Slot> = self.nodes[slot as usize]
                .neighbors
                .iter()
                .map(|&(s, _)| s)
                .collect();
            for neighbor_slot in moved_neighbors {
                if let Some(edge) = self.nodes[neighbor_slot as usize]
                    .neighbors
                    .iter_mut()
                    .find(|(s, _)| *s == last)
                {
                    edge.0 = slot;
                }
            }
        }

        removed
    }

    /// Detach `value`, drop its reverse edges, heal its former neighbors'
    /// connectivity, and re-prune them. Returns `false` if `value` was
    /// absent.
    pub(crate) fn remove_impl(&mut self, value: &T) -> bool {
        let slot = match self.slots.remove(value) {
            Some(s) => s,
            None => return false,
        };
        let last = (self.nodes.len() - 1) as Slot;
        let removed = self.remove_slot(slot);

        // Any reference in `removed`'s own neighbor list to the node that
        // got swapped into `slot` (i.e. the one previously at `last`) must
        // be remapped to its new home.
        let former_neighbors: Vec<Slot> = removed
            .neighbors
            .iter()
            .map(|&(s, _)| if s == last { slot } else { s })
            .collect();

        for &u in &former_neighbors {
            self.nodes[u as usize].remove_neighbor(slot);
        }

        let m = self.config.m;
        for (i, &u) in former_neighbors.iter().enumerate() {
            for (j, &v) in former_neighbors.iter().enumerate() {
                if i == j || u == v {
                    continue;
                }
                if self.nodes[u as usize].neighbors.len() >= m {
                    continue;
                }
                if self.nodes[u as usize].distance_to(v).is_some() {
                    continue;
                }
                let d = self
                    .metric()
                    .distance(&self.nodes[u as usize].value, &self.nodes[v as usize].value);
                self.nodes[u as usize].add_or_update(v, d);
                self.nodes[v as usize].add_or_update(u, d);
            }
        }

        for &u in &former_neighbors {
            self.prune_node(u);
        }

        true
    }
}
