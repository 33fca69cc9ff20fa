// ═══════════════════════════════════════════════════════════════════════
// Audit — invariants that must hold between any two accepted actions
// ═══════════════════════════════════════════════════════════════════════

use anyhow::{ensure, Result};
use isles_engine::types::*;
use isles_engine::GameView;

/// Check the closed economy and structural invariants of a game.
pub fn check(view: &GameView) -> Result<()> {
    let totals = view.color_totals();
    ensure!(
        totals == [STUDENTS_PER_COLOR; 5],
        "student totals drifted: {:?}",
        totals
    );

    let coins = view.coins_in_play();
    let expected = if view.expert() { TOTAL_COINS } else { 0 };
    ensure!(coins == expected, "coins in play {} != {}", coins, expected);

    let n = view.players().len();
    for p in view.players() {
        ensure!(
            p.dashboard.rooks <= rook_count(n),
            "{} holds {} rooks",
            p.id,
            p.dashboard.rooks
        );
        ensure!(
            p.dashboard.hall.iter().all(|&c| c <= HALL_CAPACITY),
            "{} overflowed a hall row",
            p.id
        );
    }

    let islands = view.islands();
    ensure!(islands.len() >= MIN_ISLAND_GROUPS, "only {} island groups", islands.len());
    ensure!(view.marker() < islands.len(), "marker {} off the ring", view.marker());
    let merged: u32 = islands.iter().map(|i| i.merge_count).sum();
    ensure!(merged == NUM_ISLANDS as u32, "merge counts sum to {}", merged);

    for color in Color::ALL {
        let holders = view
            .players()
            .iter()
            .filter(|p| p.dashboard.has_professor(color))
            .count();
        ensure!(holders <= 1, "professor {} held {} times", color, holders);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use isles_engine::{Game, GameConfig};

    #[test]
    fn test_fresh_games_pass() {
        for (players, expert) in [(2, false), (2, true), (3, false), (3, true)] {
            let ids = (1..=players).map(PlayerId).collect();
            let g = Game::new(GameConfig::new(ids, expert), 17).unwrap();
            check(&GameView::new(&g)).unwrap();
        }
    }
}
