//! Night resolution.
//!
//! Pure merge of the night's target selections into a result delta. The
//! merge order is fixed here and does not re-derive from step priorities:
//! pairing, kill marks, protections, witch potions, seer checks, then the
//! final set difference. Protection beats any number of kill marks.
//!
//! Nothing in here mutates the roster or the potion flags; the session
//! applies the returned deltas on the phase boundary.

use std::collections::BTreeMap;

use crate::roles::RoleId;
use crate::session::{Player, PlayerId, WitchPotions};
use crate::steps::{
    STEP_NIGHT_CUPID, STEP_NIGHT_DOCTOR, STEP_NIGHT_SEER, STEP_NIGHT_WEREWOLF,
    STEP_NIGHT_WITCH_KILL, STEP_NIGHT_WITCH_SAVE,
};

/// Outcome of one night, before the session applies it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NightResult {
    /// Marked for death minus protected.
    pub eliminated: Vec<PlayerId>,
    /// Everyone protected tonight, whether or not they were attacked.
    pub saved: Vec<PlayerId>,
    /// Seer reveals: target to the role the seer was shown.
    pub checked: BTreeMap<PlayerId, RoleId>,
    /// Candidate love pair; the session decides whether to commit it.
    pub cupid_pair: Option<[PlayerId; 2]>,
    pub used_life_potion: bool,
    pub used_death_potion: bool,
}

fn targets_of<'a>(
    selections: &'a BTreeMap<String, Vec<PlayerId>>,
    step_id: &str,
) -> &'a [PlayerId] {
    selections.get(step_id).map_or(&[], Vec::as_slice)
}

fn mark(set: &mut Vec<PlayerId>, id: PlayerId) {
    if !set.contains(&id) {
        set.push(id);
    }
}

/// Resolve one night. Missing selections mean the action was skipped; no
/// selection shape is an error.
#[must_use]
pub fn resolve_night(
    players: &[Player],
    selections: &BTreeMap<String, Vec<PlayerId>>,
    potions: WitchPotions,
) -> NightResult {
    let mut marked: Vec<PlayerId> = Vec::new();
    let mut protected: Vec<PlayerId> = Vec::new();
    let mut result = NightResult::default();

    // 1. Pairing: exactly two targets make a candidate pair.
    let cupid = targets_of(selections, STEP_NIGHT_CUPID);
    if let [a, b] = *cupid {
        result.cupid_pair = Some([a, b]);
    }

    // 2. Werewolf kill marks.
    for &id in targets_of(selections, STEP_NIGHT_WEREWOLF) {
        mark(&mut marked, id);
    }

    // 3. Doctor protection.
    for &id in targets_of(selections, STEP_NIGHT_DOCTOR) {
        mark(&mut protected, id);
    }

    // 4. Witch life potion, only while the charge is unspent.
    if potions.life {
        let saves = targets_of(selections, STEP_NIGHT_WITCH_SAVE);
        if !saves.is_empty() {
            for &id in saves {
                mark(&mut protected, id);
            }
            result.used_life_potion = true;
        }
    }

    // 5. Witch death potion.
    if potions.death {
        let kills = targets_of(selections, STEP_NIGHT_WITCH_KILL);
        if !kills.is_empty() {
            for &id in kills {
                mark(&mut marked, id);
            }
            result.used_death_potion = true;
        }
    }

    // 6. Seer checks reveal the target's current role.
    for &id in targets_of(selections, STEP_NIGHT_SEER) {
        if let Some(role) = players.iter().find(|p| p.id == id).and_then(|p| p.role_id) {
            result.checked.insert(id, role);
        }
    }

    // 7. Final set difference.
    result.eliminated = marked
        .into_iter()
        .filter(|id| !protected.contains(id))
        .collect();
    result.saved = protected;

    result
}
