//! Night and day step builders.
//!
//! A step is one atomic unit of moderator guidance: an announcement, a
//! role's wake-up call, a night-1 mapping assignment, discussion, or vote.
//! Builders are pure; they read the roster and emit an ordered script for
//! the presentation layer to walk.
//!
//! Contract: the night builder scans the whole roster, dead players
//! included. A night-active role whose holders are all dead still produces
//! a placeholder step with an empty participant list, so the table cannot
//! infer a death from a missing wake-up call.

use smallvec::SmallVec;

use crate::roles::{self, Role, RoleId};
use crate::session::{Phase, Player, PlayerId, WitchPotions};
use crate::story::DescriptionSource;

/// Wire-stable step ids shared with the resolution engine.
pub const STEP_NIGHT_SLEEP: &str = "night-sleep";
pub const STEP_NIGHT_WAKE: &str = "night-wake";
pub const STEP_NIGHT_WEREWOLF: &str = "night-werewolf";
pub const STEP_NIGHT_SEER: &str = "night-seer";
pub const STEP_NIGHT_DOCTOR: &str = "night-doctor";
pub const STEP_NIGHT_CUPID: &str = "night-cupid";
pub const STEP_NIGHT_WITCH_SAVE: &str = "night-witch-save";
pub const STEP_NIGHT_WITCH_KILL: &str = "night-witch-kill";
pub const STEP_DAY_ANNOUNCE: &str = "day-announce";
pub const STEP_DAY_HUNTER_SHOT: &str = "day-hunter-shot";
pub const STEP_DAY_DISCUSS: &str = "day-discuss";
pub const STEP_DAY_VOTE: &str = "day-vote";
pub const STEP_DAY_RESULT: &str = "day-result";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Night-1 "deal this role to its players" ritual.
    Mapping,
    Announcement,
    RoleAction,
    Discussion,
    Vote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseStep {
    /// Stable string key; target selections are recorded under it.
    pub id: String,
    pub role_id: Option<RoleId>,
    pub kind: StepKind,
    pub title: DescriptionSource,
    pub description: DescriptionSource,
    /// Players involved in the step. Empty for announcements and for
    /// dead-role placeholders.
    pub player_ids: SmallVec<[PlayerId; 8]>,
    /// Mapping steps: exact number of players this role must be dealt to.
    pub target_count: Option<usize>,
    /// Action steps: cap on simultaneous target selection.
    pub max_targets: Option<u8>,
    /// The role's holders are all dead; the step is shown but disabled.
    pub is_dead_role: bool,
}

impl PhaseStep {
    fn announcement(id: &str, title: &'static str, description: DescriptionSource) -> Self {
        Self {
            id: id.to_string(),
            role_id: None,
            kind: StepKind::Announcement,
            title: DescriptionSource::Fixed(title),
            description,
            player_ids: SmallVec::new(),
            target_count: None,
            max_targets: None,
            is_dead_role: false,
        }
    }
}

/// Step id for a role's regular night action.
#[must_use]
pub fn night_action_step_id(role: RoleId) -> String {
    format!("night-{role}")
}

/// Step id for a role's night-1 mapping step.
#[must_use]
pub fn mapping_step_id(role: RoleId) -> String {
    format!("night-mapping-{role}")
}

/// Build the ordered night script.
///
/// `pool` is the reconciled role-pool multiset; it only matters on night 1,
/// when each distinct non-filler role gets a mapping step sized to its
/// multiplicity.
#[must_use]
pub fn night_steps(
    players: &[Player],
    cycle: u32,
    pool: &[RoleId],
    potions: WitchPotions,
) -> Vec<PhaseStep> {
    let mut steps = Vec::new();

    if cycle == 1 {
        for role in roles::by_priority(|r| {
            r.id != RoleId::Villager && pool.contains(&r.id)
        }) {
            let multiplicity = pool.iter().filter(|&&id| id == role.id).count();
            steps.push(PhaseStep {
                id: mapping_step_id(role.id),
                role_id: Some(role.id),
                kind: StepKind::Mapping,
                title: DescriptionSource::Fixed("phase.night.mapping.role"),
                description: DescriptionSource::Fixed("phase.night.mapping.desc"),
                player_ids: players.iter().map(|p| p.id).collect(),
                target_count: Some(multiplicity),
                max_targets: None,
                is_dead_role: false,
            });
        }
    }

    steps.push(PhaseStep::announcement(
        STEP_NIGHT_SLEEP,
        "phase.night.sleep",
        DescriptionSource::StoryOverride {
            phase: Phase::Night,
            fallback: "phase.night.sleep.desc",
        },
    ));

    // Scan the full roster. Dead holders still register their role so the
    // step list shape stays independent of who died.
    let night_roles = roles::by_priority(|r| r.night_action);
    for role in night_roles {
        if role.first_night_only && cycle != 1 {
            continue;
        }
        let holders: Vec<&Player> = players
            .iter()
            .filter(|p| p.role_id == Some(role.id))
            .collect();
        if holders.is_empty() {
            continue;
        }
        let alive: SmallVec<[PlayerId; 8]> = holders
            .iter()
            .filter(|p| p.is_alive)
            .map(|p| p.id)
            .collect();
        let all_dead = alive.is_empty();

        if role.id == RoleId::Witch {
            steps.extend(witch_steps(role, &alive, all_dead, potions));
        } else {
            steps.push(PhaseStep {
                id: night_action_step_id(role.id),
                role_id: Some(role.id),
                kind: StepKind::RoleAction,
                title: DescriptionSource::Fixed("phase.night.roleWake"),
                description: DescriptionSource::RoleTemplate {
                    role: role.id,
                    fallback: "phase.night.roleWake",
                },
                player_ids: if all_dead { SmallVec::new() } else { alive },
                target_count: None,
                max_targets: role.max_targets,
                is_dead_role: all_dead,
            });
        }
    }

    steps.push(PhaseStep::announcement(
        STEP_NIGHT_WAKE,
        "phase.night.wake",
        DescriptionSource::Fixed("phase.night.wake.desc"),
    ));

    steps
}

/// The witch wakes once per remaining potion: zero, one, or two steps. A
/// dead witch collapses to a single disabled step so the script length does
/// not reveal which potions were left.
fn witch_steps(
    role: &Role,
    alive: &SmallVec<[PlayerId; 8]>,
    all_dead: bool,
    potions: WitchPotions,
) -> Vec<PhaseStep> {
    if all_dead {
        return vec![PhaseStep {
            id: STEP_NIGHT_WITCH_SAVE.to_string(),
            role_id: Some(role.id),
            kind: StepKind::RoleAction,
            title: DescriptionSource::Fixed("phase.night.roleWake"),
            description: DescriptionSource::Fixed("role.witch.nightAction.save"),
            player_ids: SmallVec::new(),
            target_count: None,
            max_targets: Some(1),
            is_dead_role: true,
        }];
    }

    let mut steps = Vec::new();
    if potions.life {
        steps.push(PhaseStep {
            id: STEP_NIGHT_WITCH_SAVE.to_string(),
            role_id: Some(role.id),
            kind: StepKind::RoleAction,
            title: DescriptionSource::Fixed("phase.night.roleWake"),
            description: DescriptionSource::Fixed("role.witch.nightAction.save"),
            player_ids: alive.clone(),
            target_count: None,
            max_targets: Some(1),
            is_dead_role: false,
        });
    }
    if potions.death {
        steps.push(PhaseStep {
            id: STEP_NIGHT_WITCH_KILL.to_string(),
            role_id: Some(role.id),
            kind: StepKind::RoleAction,
            title: DescriptionSource::Fixed("phase.night.roleWake"),
            description: DescriptionSource::Fixed("role.witch.nightAction.kill"),
            player_ids: alive.clone(),
            target_count: None,
            max_targets: Some(1),
            is_dead_role: false,
        });
    }
    steps
}

/// Build the fixed day script. When a hunter died overnight their
/// retaliation shot is wedged between the morning announcement and the
/// discussion.
#[must_use]
pub fn day_steps(hunter_pending_shot: Option<PlayerId>) -> Vec<PhaseStep> {
    let mut steps = vec![PhaseStep::announcement(
        STEP_DAY_ANNOUNCE,
        "phase.day.announce",
        DescriptionSource::StoryOverride {
            phase: Phase::Day,
            fallback: "phase.day.announce.desc",
        },
    )];

    if let Some(hunter) = hunter_pending_shot {
        steps.push(PhaseStep {
            id: STEP_DAY_HUNTER_SHOT.to_string(),
            role_id: Some(RoleId::Hunter),
            kind: StepKind::RoleAction,
            title: DescriptionSource::Fixed("phase.day.hunterShot"),
            description: DescriptionSource::Fixed("role.hunter.deathShot"),
            player_ids: SmallVec::from_slice(&[hunter]),
            target_count: None,
            max_targets: Some(1),
            is_dead_role: false,
        });
    }

    steps.push(PhaseStep {
        id: STEP_DAY_DISCUSS.to_string(),
        role_id: None,
        kind: StepKind::Discussion,
        title: DescriptionSource::Fixed("phase.day.discuss"),
        description: DescriptionSource::Fixed("phase.day.discuss.desc"),
        player_ids: SmallVec::new(),
        target_count: None,
        max_targets: None,
        is_dead_role: false,
    });
    steps.push(PhaseStep {
        id: STEP_DAY_VOTE.to_string(),
        role_id: None,
        kind: StepKind::Vote,
        title: DescriptionSource::Fixed("phase.day.vote"),
        description: DescriptionSource::Fixed("phase.day.vote.desc"),
        player_ids: SmallVec::new(),
        target_count: None,
        max_targets: None,
        is_dead_role: false,
    });
    steps.push(PhaseStep::announcement(
        STEP_DAY_RESULT,
        "phase.day.result",
        DescriptionSource::Fixed("phase.day.result.desc"),
    ));

    steps
}
