// ═══════════════════════════════════════════════════════════════════════
// Islands — mergeable territory groups arranged in a circle
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Island {
    pub students: ColorCounts,
    pub owner: Option<PlayerIndex>,
    /// Number of original islands fused into this group (>= 1).
    /// Equals the number of rooks standing on it once owned.
    pub merge_count: u32,
    pub blockaded: bool,
    /// Slot this group started from at setup (the surviving slot after merges).
    pub original_index: u32,
}

impl Island {
    pub fn new(original_index: u32) -> Self {
        Island {
            students: [0; 5],
            owner: None,
            merge_count: 1,
            blockaded: false,
            original_index,
        }
    }

    pub fn add_student(&mut self, color: Color) {
        self.students[color.index()] += 1;
    }

    pub fn count(&self, color: Color) -> u32 {
        self.students[color.index()]
    }

    pub fn total_students(&self) -> u32 {
        self.students.iter().sum()
    }

    /// Fuse `other` into `self`. Returns true when both carried a blockade,
    /// i.e. one blockade tile is now surplus.
    pub fn absorb(&mut self, other: Island) -> bool {
        for (mine, theirs) in self.students.iter_mut().zip(other.students) {
            *mine += theirs;
        }
        self.merge_count += other.merge_count;
        let surplus = self.blockaded && other.blockaded;
        self.blockaded |= other.blockaded;
        surplus
    }
}

/// Find the first adjacent pair (i, (i + 1) % len) sharing a non-null owner.
pub fn find_mergeable_pair(islands: &[Island]) -> Option<(usize, usize)> {
    let len = islands.len();
    if len < 2 {
        return None;
    }
    (0..len).find_map(|i| {
        let j = (i + 1) % len;
        match (islands[i].owner, islands[j].owner) {
            (Some(a), Some(b)) if a == b && i != j => Some((i, j)),
            _ => None,
        }
    })
}

/// New marker position after removing slot `removed` that was fused into `kept`.
pub fn marker_after_removal(marker: usize, kept: usize, removed: usize) -> usize {
    if marker == removed {
        if kept > removed { kept - 1 } else { kept }
    } else if marker > removed {
        marker - 1
    } else {
        marker
    }
}
