//! Story theme catalog and narration key resolution.
//!
//! Stories are cosmetic: they swap village names and narration flavor but
//! never change rules. Narration text is addressed by lookup key; the
//! [`DescriptionSource`] resolver picks the key by explicit match instead of
//! interpolating keys at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::roles::{self, RoleId};
use crate::session::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoryId {
    #[default]
    Classic,
    Medieval,
    Haunted,
    Pirate,
    Folklore,
}

impl StoryId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Medieval => "medieval",
            Self::Haunted => "haunted",
            Self::Pirate => "pirate",
            Self::Folklore => "folklore",
        }
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" => Ok(Self::Classic),
            "medieval" => Ok(Self::Medieval),
            "haunted" => Ok(Self::Haunted),
            "pirate" => Ok(Self::Pirate),
            "folklore" => Ok(Self::Folklore),
            _ => Err(()),
        }
    }
}

/// A narrative variant. All fields are static data; `*_key` fields address
/// the presentation layer's translation table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoryVibe {
    pub id: StoryId,
    pub village_name: &'static str,
    pub description_key: &'static str,
    pub intro_key: &'static str,
    pub night_key: &'static str,
    pub day_key: &'static str,
}

pub static STORIES: [StoryVibe; 5] = [
    StoryVibe {
        id: StoryId::Classic,
        village_name: "Ravenhollow",
        description_key: "story.classic.desc",
        intro_key: "narrator.intro.classic",
        night_key: "narrator.night.classic",
        day_key: "narrator.day.classic",
    },
    StoryVibe {
        id: StoryId::Medieval,
        village_name: "Ironkeep",
        description_key: "story.medieval.desc",
        intro_key: "narrator.intro.medieval",
        night_key: "narrator.night.medieval",
        day_key: "narrator.day.medieval",
    },
    StoryVibe {
        id: StoryId::Haunted,
        village_name: "Hollowshade",
        description_key: "story.haunted.desc",
        intro_key: "narrator.intro.haunted",
        night_key: "narrator.night.haunted",
        day_key: "narrator.day.haunted",
    },
    StoryVibe {
        id: StoryId::Pirate,
        village_name: "Blacktide Bay",
        description_key: "story.pirate.desc",
        intro_key: "narrator.intro.pirate",
        night_key: "narrator.night.pirate",
        day_key: "narrator.day.pirate",
    },
    StoryVibe {
        id: StoryId::Folklore,
        village_name: "Làng Trăng Khuyết",
        description_key: "story.folklore.desc",
        intro_key: "narrator.intro.folklore",
        night_key: "narrator.night.folklore",
        day_key: "narrator.day.folklore",
    },
];

/// Look up a story by id.
#[must_use]
pub fn story(id: StoryId) -> &'static StoryVibe {
    STORIES.iter().find(|s| s.id == id).unwrap_or(&STORIES[0])
}

/// Where a step's title or description text comes from.
///
/// Fallback chain: a story override resolves through the selected story's
/// narration keys, a role template resolves through the role catalog, a
/// fixed key resolves to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionSource {
    /// A phase-independent key such as `phase.day.vote`.
    Fixed(&'static str),
    /// The role's night-action text; falls back to `fallback` when the
    /// catalog carries no action key for the role.
    RoleTemplate {
        role: RoleId,
        fallback: &'static str,
    },
    /// Story-flavored narration for a phase announcement.
    StoryOverride {
        phase: Phase,
        fallback: &'static str,
    },
}

impl DescriptionSource {
    /// Resolve to a lookup key against the given story selection.
    #[must_use]
    pub fn resolve(&self, story_id: StoryId) -> &'static str {
        match *self {
            Self::Fixed(key) => key,
            Self::RoleTemplate { role, fallback } => {
                roles::role(role).night_action_key.unwrap_or(fallback)
            }
            Self::StoryOverride { phase, fallback } => {
                let vibe = story(story_id);
                match phase {
                    Phase::Night => {
                        if vibe.night_key.is_empty() {
                            fallback
                        } else {
                            vibe.night_key
                        }
                    }
                    Phase::Day => {
                        if vibe.day_key.is_empty() {
                            fallback
                        } else {
                            vibe.day_key
                        }
                    }
                }
            }
        }
    }
}
