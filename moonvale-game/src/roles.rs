//! Static role catalog.
//!
//! Pure data: factions, night-order priorities, and per-role ability flags.
//! The night step builder and the resolution engine both key off this table;
//! catalog declaration order is the tie-break when priorities are equal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side a role fights for, used by the win evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Village,
    Werewolves,
    Neutral,
}

impl Faction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Village => "village",
            Self::Werewolves => "werewolves",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleId {
    Villager,
    Werewolf,
    Seer,
    Doctor,
    Hunter,
    Cupid,
    Witch,
}

impl RoleId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Villager => "villager",
            Self::Werewolf => "werewolf",
            Self::Seer => "seer",
            Self::Doctor => "doctor",
            Self::Hunter => "hunter",
            Self::Cupid => "cupid",
            Self::Witch => "witch",
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "villager" => Ok(Self::Villager),
            "werewolf" => Ok(Self::Werewolf),
            "seer" => Ok(Self::Seer),
            "doctor" => Ok(Self::Doctor),
            "hunter" => Ok(Self::Hunter),
            "cupid" => Ok(Self::Cupid),
            "witch" => Ok(Self::Witch),
            _ => Err(()),
        }
    }
}

impl From<RoleId> for String {
    fn from(value: RoleId) -> Self {
        value.as_str().to_string()
    }
}

/// A single catalog entry. Text fields are lookup keys, not prose; the
/// presentation layer owns translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Role {
    pub id: RoleId,
    pub faction: Faction,
    /// Night wake order, lower wakes earlier.
    pub priority: u8,
    pub night_action: bool,
    /// Cap on simultaneous targets for the role's night action.
    pub max_targets: Option<u8>,
    /// The role acts on night 1 only (pairing ritual).
    pub first_night_only: bool,
    pub name_key: &'static str,
    pub description_key: &'static str,
    pub night_action_key: Option<&'static str>,
}

/// Catalog in declaration order. `Villager` is the filler role the session
/// pads short role pools with.
pub static ROLES: [Role; 7] = [
    Role {
        id: RoleId::Villager,
        faction: Faction::Village,
        priority: 100,
        night_action: false,
        max_targets: None,
        first_night_only: false,
        name_key: "role.villager.name",
        description_key: "role.villager.desc",
        night_action_key: None,
    },
    Role {
        id: RoleId::Werewolf,
        faction: Faction::Werewolves,
        priority: 10,
        night_action: true,
        max_targets: Some(1),
        first_night_only: false,
        name_key: "role.werewolf.name",
        description_key: "role.werewolf.desc",
        night_action_key: Some("role.werewolf.nightAction"),
    },
    Role {
        id: RoleId::Seer,
        faction: Faction::Village,
        priority: 20,
        night_action: true,
        max_targets: Some(1),
        first_night_only: false,
        name_key: "role.seer.name",
        description_key: "role.seer.desc",
        night_action_key: Some("role.seer.nightAction"),
    },
    Role {
        id: RoleId::Doctor,
        faction: Faction::Village,
        priority: 30,
        night_action: true,
        max_targets: Some(1),
        first_night_only: false,
        name_key: "role.doctor.name",
        description_key: "role.doctor.desc",
        night_action_key: Some("role.doctor.nightAction"),
    },
    Role {
        id: RoleId::Hunter,
        faction: Faction::Village,
        priority: 40,
        night_action: false,
        max_targets: None,
        first_night_only: false,
        name_key: "role.hunter.name",
        description_key: "role.hunter.desc",
        night_action_key: None,
    },
    Role {
        id: RoleId::Cupid,
        faction: Faction::Village,
        priority: 5,
        night_action: true,
        max_targets: Some(2),
        first_night_only: true,
        name_key: "role.cupid.name",
        description_key: "role.cupid.desc",
        night_action_key: Some("role.cupid.nightAction"),
    },
    Role {
        id: RoleId::Witch,
        faction: Faction::Village,
        priority: 25,
        night_action: true,
        max_targets: Some(1),
        first_night_only: false,
        name_key: "role.witch.name",
        description_key: "role.witch.desc",
        night_action_key: Some("role.witch.nightAction"),
    },
];

/// Look up a catalog entry by id.
#[must_use]
pub fn role(id: RoleId) -> &'static Role {
    // The catalog covers every RoleId variant.
    ROLES
        .iter()
        .find(|r| r.id == id)
        .unwrap_or(&ROLES[0])
}

/// Faction of a role id.
#[must_use]
pub fn faction_of(id: RoleId) -> Faction {
    role(id).faction
}

/// Catalog entries filtered and sorted by night priority, declaration order
/// breaking ties. The sort is stable so equal priorities keep catalog order.
#[must_use]
pub fn by_priority(mut keep: impl FnMut(&Role) -> bool) -> Vec<&'static Role> {
    let mut roles: Vec<&'static Role> = ROLES.iter().filter(|r| keep(r)).collect();
    roles.sort_by_key(|r| r.priority);
    roles
}
