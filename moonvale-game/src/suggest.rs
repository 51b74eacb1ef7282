//! Role pool suggestion from the table head count.

use crate::roles::RoleId;

/// Suggest a balanced role pool for `player_count` seats.
///
/// Werewolves scale in fixed bands; specialists unlock at thresholds. Filler
/// villagers are not included; the session pads the pool at game start.
#[must_use]
pub fn suggest_roles(player_count: usize) -> Vec<RoleId> {
    let mut pool = Vec::new();
    if player_count == 0 {
        return pool;
    }

    let werewolves = match player_count {
        0..=6 => 1,
        7..=11 => 2,
        12..=15 => 3,
        _ => 4,
    };
    pool.extend(std::iter::repeat(RoleId::Werewolf).take(werewolves));

    if player_count >= 4 {
        pool.push(RoleId::Seer);
    }
    if player_count >= 6 {
        pool.push(RoleId::Doctor);
    }
    if player_count >= 8 {
        pool.push(RoleId::Hunter);
    }
    if player_count >= 10 {
        pool.push(RoleId::Witch);
    }
    if player_count >= 12 {
        pool.push(RoleId::Cupid);
    }

    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wolves(pool: &[RoleId]) -> usize {
        pool.iter().filter(|&&r| r == RoleId::Werewolf).count()
    }

    #[test]
    fn zero_players_gets_empty_pool() {
        assert!(suggest_roles(0).is_empty());
    }

    #[test]
    fn werewolf_bands() {
        assert_eq!(wolves(&suggest_roles(4)), 1);
        assert_eq!(wolves(&suggest_roles(7)), 2);
        assert_eq!(wolves(&suggest_roles(12)), 3);
        assert_eq!(wolves(&suggest_roles(16)), 4);
        assert_eq!(wolves(&suggest_roles(40)), 4);
    }

    #[test]
    fn specialist_thresholds() {
        assert!(!suggest_roles(3).contains(&RoleId::Seer));
        assert!(suggest_roles(4).contains(&RoleId::Seer));
        assert!(suggest_roles(6).contains(&RoleId::Doctor));
        assert!(suggest_roles(8).contains(&RoleId::Hunter));
        assert!(suggest_roles(10).contains(&RoleId::Witch));
        assert!(suggest_roles(12).contains(&RoleId::Cupid));
        assert!(!suggest_roles(11).contains(&RoleId::Cupid));
    }

    #[test]
    fn pool_never_exceeds_player_count() {
        for n in 0..=40 {
            assert!(suggest_roles(n).len() <= n.max(0), "n={n}");
        }
    }

    #[test]
    fn wolf_count_is_monotonic() {
        let mut prev = 0;
        for n in 0..=40 {
            let count = wolves(&suggest_roles(n));
            assert!(count >= prev, "wolf count dipped at n={n}");
            prev = count;
        }
    }

    #[test]
    fn never_suggests_filler() {
        for n in 0..=40 {
            assert!(!suggest_roles(n).contains(&RoleId::Villager));
        }
    }
}
