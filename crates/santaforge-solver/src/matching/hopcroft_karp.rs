//! Hopcroft-Karp maximum matching.
//!
//! Each phase runs a BFS from all free givers to layer the graph, then a
//! DFS per free giver along strictly increasing layers. Phases repeat until
//! no augmenting path remains, at most O(√V) times.

use std::collections::VecDeque;

use super::{Edges, UNMATCHED};

const INFINITE: usize = usize::MAX;

struct HopcroftKarp<'a> {
    adjacency: &'a [Edges],
    match_left: Vec<usize>,
    match_right: Vec<usize>,
    dist: Vec<usize>,
}

impl<'a> HopcroftKarp<'a> {
    fn new(adjacency: &'a [Edges]) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            match_left: vec![UNMATCHED; n],
            match_right: vec![UNMATCHED; n],
            dist: vec![INFINITE; n],
        }
    }

    // Layers givers by distance from the free ones. Returns whether any free
    // receiver is reachable.
    fn bfs(&mut self) -> bool {
        let mut queue = VecDeque::with_capacity(self.adjacency.len());
        for (giver, &receiver) in self.match_left.iter().enumerate() {
            if receiver == UNMATCHED {
                self.dist[giver] = 0;
                queue.push_back(giver);
            } else {
                self.dist[giver] = INFINITE;
            }
        }

        let mut found = false;
        while let Some(giver) = queue.pop_front() {
            for &receiver in &self.adjacency[giver] {
                let next = self.match_right[receiver];
                if next == UNMATCHED {
                    found = true;
                } else if self.dist[next] == INFINITE {
                    self.dist[next] = self.dist[giver] + 1;
                    queue.push_back(next);
                }
            }
        }
        found
    }

    fn dfs(&mut self, giver: usize) -> bool {
        let adjacency = self.adjacency;
        for &receiver in &adjacency[giver] {
            let next = self.match_right[receiver];
            let augments = next == UNMATCHED
                || (self.dist[next] == self.dist[giver] + 1 && self.dfs(next));
            if augments {
                self.match_left[giver] = receiver;
                self.match_right[receiver] = giver;
                return true;
            }
        }
        // Dead end for this phase.
        self.dist[giver] = INFINITE;
        false
    }

    fn run(mut self) -> Vec<usize> {
        while self.bfs() {
            for giver in 0..self.adjacency.len() {
                if self.match_left[giver] == UNMATCHED {
                    self.dfs(giver);
                }
            }
        }
        self.match_left
    }
}

/// Returns the receiver matched to each giver, or `UNMATCHED`.
pub(super) fn solve(adjacency: &[Edges]) -> Vec<usize> {
    HopcroftKarp::new(adjacency).run()
}
