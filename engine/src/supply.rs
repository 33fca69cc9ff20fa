// ═══════════════════════════════════════════════════════════════════════
// Supply pools — one per player, refilled from the bag each round
// ═══════════════════════════════════════════════════════════════════════

use std::collections::VecDeque;

use crate::types::Color;

/// Refill every empty pool with `per_pool` students from the front of the bag.
/// Pools still holding students are left alone. Returns false, drawing
/// nothing, when the bag cannot fill every empty pool.
pub fn refill(clouds: &mut [Vec<Color>], bag: &mut VecDeque<Color>, per_pool: usize) -> bool {
    let empty = clouds.iter().filter(|c| c.is_empty()).count();
    if bag.len() < empty * per_pool {
        return false;
    }
    for cloud in clouds.iter_mut().filter(|c| c.is_empty()) {
        cloud.extend(bag.drain(..per_pool));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refill_only_empty_pools() {
        let mut clouds = vec![vec![Color::Red], Vec::new()];
        let mut bag: VecDeque<Color> = vec![Color::Blue, Color::Green, Color::Pink, Color::Yellow].into();
        assert!(refill(&mut clouds, &mut bag, 3));
        assert_eq!(clouds[0], vec![Color::Red]);
        assert_eq!(clouds[1], vec![Color::Blue, Color::Green, Color::Pink]);
        assert_eq!(bag, VecDeque::from(vec![Color::Yellow]));
    }

    #[test]
    fn test_short_bag_draws_nothing() {
        let mut clouds = vec![Vec::new(), Vec::new()];
        let mut bag: VecDeque<Color> = vec![Color::Blue; 5].into();
        assert!(!refill(&mut clouds, &mut bag, 3));
        assert_eq!(bag.len(), 5);
        assert!(clouds.iter().all(Vec::is_empty));
    }
}
