//! Greedy weighted max-clique.
//!
//! Given nodes carrying costs and an undirected adjacency relation, [`MaxClique`] grows
//! a clique greedily:
//!
//! 1. Start from the node maximizing its own cost plus the costs of its neighbours.
//! 2. Keep the candidate set `C` of nodes adjacent to everything chosen so far. Pick
//!    the node of `C` maximizing its own cost plus the costs of its neighbours inside
//!    `C`, add it, and shrink `C` to its neighbours.
//! 3. Stop when `C` is empty.
//!
//! The result is *a* clique, not necessarily a maximum one. Ties go to the node found
//! first, so the outcome is deterministic for a given construction order.
//!
//! The solver uses the accumulated cost as a lower bound: nodes are rows whose covering
//! columns are pairwise disjoint, so any clique weighs no more than an optimal cover.

use log::debug;

use crate::cost::Cost;

#[derive(Debug, Clone)]
pub struct MaxClique<C> {
    costs: Vec<C>,
    /// Adjacency lists; sorted and deduplicated by [`MaxClique::solve`].
    adj: Vec<Vec<usize>>,
}

impl<C: Cost> MaxClique<C> {
    /// Creates a graph with `n` isolated zero-cost nodes.
    pub fn new(n: usize) -> Self {
        Self {
            costs: vec![C::zero(); n],
            adj: vec![Vec::new(); n],
        }
    }

    pub fn node_count(&self) -> usize {
        self.costs.len()
    }

    pub fn set_cost(&mut self, node: usize, cost: C) {
        assert!(node < self.node_count(), "Node {} out of range 0..{}", node, self.node_count());
        self.costs[node] = cost;
    }

    /// Adds the undirected edge `i -- j`. Self-loops are ignored.
    pub fn connect(&mut self, i: usize, j: usize) {
        let n = self.node_count();
        assert!(i < n && j < n, "Edge ({}, {}) out of range 0..{}", i, j, n);
        if i == j {
            return;
        }
        self.adj[i].push(j);
        self.adj[j].push(i);
    }

    /// Runs the greedy search.
    ///
    /// Returns the total cost of the clique and its nodes in selection order.
    pub fn solve(&mut self) -> (C, Vec<usize>) {
        for list in self.adj.iter_mut() {
            list.sort_unstable();
            list.dedup();
        }

        let mut result = Vec::new();
        let mut total = C::zero();

        // Seed: own cost plus the whole neighbourhood.
        let mut seed: Option<(usize, C)> = None;
        for node in 0..self.node_count() {
            let w = self.weight_within(node, &self.adj[node]);
            if seed.as_ref().map_or(true, |(_, best)| w > *best) {
                seed = Some((node, w));
            }
        }
        let Some((seed, _)) = seed else {
            return (total, result);
        };

        result.push(seed);
        total += &self.costs[seed];
        let mut candidates = self.adj[seed].clone();

        while !candidates.is_empty() {
            let mut pick: Option<(usize, C)> = None;
            for &node in &candidates {
                let w = self.weight_within(node, &candidates);
                if pick.as_ref().map_or(true, |(_, best)| w > *best) {
                    pick = Some((node, w));
                }
            }
            let Some((node, _)) = pick else {
                unreachable!("non-empty candidate set always yields a pick");
            };

            debug!("clique: add node {} ({} candidates)", node, candidates.len());
            result.push(node);
            total += &self.costs[node];
            candidates = intersect(&candidates, &self.adj[node]);
        }

        debug!("clique: {} nodes, cost {:?}", result.len(), total);
        (total, result)
    }

    /// Cost of `node` plus the costs of its neighbours that are members of `set`.
    ///
    /// `set` must be sorted.
    fn weight_within(&self, node: usize, set: &[usize]) -> C {
        let mut w = self.costs[node].clone();
        for x in intersect(&self.adj[node], set) {
            w += &self.costs[x];
        }
        w
    }
}

/// Intersection of two sorted lists.
fn intersect(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut res = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                res.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    res
}
