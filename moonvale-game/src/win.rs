//! Win condition evaluation.
//!
//! Advisory only: the session exposes this but never gates a phase
//! transition on it. The moderator decides when to call the game.

use serde::{Deserialize, Serialize};

use crate::roles::{self, Faction};
use crate::session::{Player, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinResult {
    Village,
    Werewolves,
    Lovers,
}

/// Evaluate the table. `None` means the game continues.
///
/// Order matters: the lovers' win is checked first because it overrides
/// both faction counts.
#[must_use]
pub fn check_win(players: &[Player], lovers: &[PlayerId]) -> Option<WinResult> {
    let alive: Vec<&Player> = players.iter().filter(|p| p.is_alive).collect();

    let mut alive_werewolves = 0usize;
    let mut alive_others = 0usize;
    for player in &alive {
        match player.role_id.map(roles::faction_of) {
            Some(Faction::Werewolves) => alive_werewolves += 1,
            _ => alive_others += 1,
        }
    }

    // Lovers: the last two standing are the pair, from opposing factions.
    if lovers.len() == 2
        && alive.len() == 2
        && lovers.iter().all(|id| alive.iter().any(|p| p.id == *id))
    {
        let factions: Vec<Option<Faction>> = lovers
            .iter()
            .map(|id| {
                players
                    .iter()
                    .find(|p| p.id == *id)
                    .and_then(|p| p.role_id)
                    .map(roles::faction_of)
            })
            .collect();
        if let [Some(a), Some(b)] = factions[..] {
            if a != b {
                return Some(WinResult::Lovers);
            }
        }
    }

    if alive_werewolves == 0 {
        return Some(WinResult::Village);
    }
    if alive_werewolves >= alive_others {
        return Some(WinResult::Werewolves);
    }
    None
}
