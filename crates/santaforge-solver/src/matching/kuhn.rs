//! Kuhn's augmenting-path matching, O(V·E).

use super::{Edges, UNMATCHED};

struct Kuhn<'a> {
    adjacency: &'a [Edges],
    match_right: Vec<usize>,
    visited: Vec<bool>,
}

impl Kuhn<'_> {
    fn try_augment(&mut self, giver: usize) -> bool {
        let adjacency = self.adjacency;
        for &receiver in &adjacency[giver] {
            if self.visited[receiver] {
                continue;
            }
            self.visited[receiver] = true;
            let current = self.match_right[receiver];
            if current == UNMATCHED || self.try_augment(current) {
                self.match_right[receiver] = giver;
                return true;
            }
        }
        false
    }
}

/// Returns the receiver matched to each giver, or `UNMATCHED`.
pub(super) fn solve(adjacency: &[Edges]) -> Vec<usize> {
    let n = adjacency.len();
    let mut kuhn = Kuhn {
        adjacency,
        match_right: vec![UNMATCHED; n],
        visited: vec![false; n],
    };

    for giver in 0..n {
        kuhn.visited.fill(false);
        kuhn.try_augment(giver);
    }

    let mut match_left = vec![UNMATCHED; n];
    for (receiver, &giver) in kuhn.match_right.iter().enumerate() {
        if giver != UNMATCHED {
            match_left[giver] = receiver;
        }
    }
    match_left
}
