//! Merge/find sets (union-find) over `0..n`.
//!
//! Used by the lower bound to group rows that share a covering column.

/// Disjoint-set forest with union by rank and path compression.
#[derive(Debug, Clone)]
pub struct MfSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl MfSet {
    /// Creates `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns the representative of the set containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        assert!(x < self.len(), "Element {} out of range 0..{}", x, self.len());

        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut x = x;
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    /// Merges the sets containing `x` and `y`, returning the new representative.
    pub fn merge(&mut self, x: usize, y: usize) -> usize {
        let x = self.find(x);
        let y = self.find(y);
        if x == y {
            return x;
        }
        let (root, child) = if self.rank[x] < self.rank[y] { (y, x) } else { (x, y) };
        self.parent[child] = root;
        if self.rank[root] == self.rank[child] {
            self.rank[root] += 1;
        }
        root
    }
}
