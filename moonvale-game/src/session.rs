//! Game session aggregate and state machine.
//!
//! `GameSession` owns the authoritative game record: roster, role pool,
//! the night's target selections, lovers, potion charges, and the pending
//! hunter shot. It is also the serialized session shape; every field
//! round-trips through serde losslessly.
//!
//! All operations are synchronous local transitions. The only failures are
//! precondition rejections (`SessionError`); missing target selections are
//! skips, never errors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use uuid::Uuid;

use crate::night::{self, NightResult};
use crate::roles::RoleId;
use crate::steps::{self, PhaseStep};
use crate::story::StoryId;
use crate::suggest;
use crate::win::{self, WinResult};

pub type PlayerId = Uuid;
pub type SessionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Setup,
    Playing,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Day,
    #[default]
    Night,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Day => "day",
            Self::Night => "night",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub role_id: Option<RoleId>,
    pub is_alive: bool,
    #[serde(default)]
    pub notes: String,
}

impl Player {
    fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            role_id: None,
            is_alive: true,
            notes: String::new(),
        }
    }
}

/// The witch's two one-shot charges. Spent charges stay spent for the rest
/// of the game; only `start_game`/`reset` refill them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitchPotions {
    pub life: bool,
    pub death: bool,
}

impl Default for WitchPotions {
    fn default() -> Self {
        Self {
            life: true,
            death: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub id: SessionId,
    pub status: Status,
    pub phase: Phase,
    /// Nights elapsed; 0 only while in setup.
    pub cycle: u32,
    pub phase_step_index: usize,
}

/// Precondition rejections. State is untouched when one of these comes back.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot start a game with an empty roster")]
    EmptyRoster,
    #[error("step index {index} out of bounds ({len} steps)")]
    StepOutOfBounds { index: usize, len: usize },
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
}

/// The aggregate root. Field layout is the wire shape: serializing a
/// session produces exactly the stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub settings: GameSettings,
    pub players: Vec<Player>,
    /// Role-pool multiset, reconciled against the roster at game start.
    pub roles: Vec<RoleId>,
    /// Step id to selected target ids, scoped to the current night.
    pub targets: BTreeMap<String, Vec<PlayerId>>,
    /// Exactly 0 or 2 ids; committed once, immutable until reset.
    pub lovers: Vec<PlayerId>,
    pub witch_potions: WitchPotions,
    pub hunter_pending_shot: Option<PlayerId>,
    pub story_id: StoryId,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            settings: GameSettings {
                id: Uuid::new_v4(),
                status: Status::Setup,
                phase: Phase::Night,
                cycle: 0,
                phase_step_index: 0,
            },
            players: Vec::new(),
            roles: vec![RoleId::Villager, RoleId::Werewolf],
            targets: BTreeMap::new(),
            lovers: Vec::new(),
            witch_potions: WitchPotions::default(),
            hunter_pending_shot: None,
            story_id: StoryId::default(),
        }
    }
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.settings.id
    }

    const fn in_setup(&self) -> bool {
        matches!(self.settings.status, Status::Setup)
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive).count()
    }

    // --- roster and pool configuration (setup only) ---

    /// Add a named player. Benign no-op once the game has started.
    pub fn add_player(&mut self, name: impl Into<String>) -> Option<PlayerId> {
        if !self.in_setup() {
            return None;
        }
        let player = Player::new(name);
        let id = player.id;
        self.players.push(player);
        Some(id)
    }

    /// Bulk-create `count` players with "Player N" default names.
    pub fn generate_players(&mut self, count: usize) {
        if !self.in_setup() {
            return;
        }
        let base = self.players.len();
        for i in 0..count {
            self.players.push(Player::new(format!("Player {}", base + i + 1)));
        }
    }

    /// Delete a player record. Only allowed during setup; once the game has
    /// started players are only ever "removed" by `is_alive = false`.
    pub fn remove_player(&mut self, id: PlayerId) {
        if !self.in_setup() {
            return;
        }
        self.players.retain(|p| p.id != id);
    }

    pub fn rename_player(&mut self, id: PlayerId, name: impl Into<String>) {
        if !self.in_setup() {
            return;
        }
        if let Some(player) = self.player_mut(id) {
            player.name = name.into();
        }
    }

    /// Moderator bookkeeping, allowed at any time.
    pub fn set_notes(&mut self, id: PlayerId, notes: impl Into<String>) {
        if let Some(player) = self.player_mut(id) {
            player.notes = notes.into();
        }
    }

    pub fn add_pool_role(&mut self, role: RoleId) {
        if self.in_setup() {
            self.roles.push(role);
        }
    }

    /// Remove the last occurrence of `role` from the pool.
    pub fn remove_pool_role(&mut self, role: RoleId) {
        if !self.in_setup() {
            return;
        }
        if let Some(pos) = self.roles.iter().rposition(|&r| r == role) {
            self.roles.remove(pos);
        }
    }

    /// Replace the pool with the suggestion engine's output for the current
    /// head count.
    pub fn suggest_pool(&mut self) {
        if self.in_setup() {
            self.roles = suggest::suggest_roles(self.players.len());
        }
    }

    /// Story selection is cosmetic and allowed at any time.
    pub fn set_story(&mut self, story: StoryId) {
        self.story_id = story;
    }

    // --- lifecycle ---

    /// Start the game: reconcile the pool against the roster, wipe all
    /// per-game state, and enter night 1 at step 0. Role assignments are
    /// cleared so the night-1 mapping ritual deals them fresh.
    ///
    /// # Errors
    ///
    /// Rejects with [`SessionError::EmptyRoster`] when no players exist;
    /// the session is left unchanged.
    pub fn start_game(&mut self) -> Result<(), SessionError> {
        if self.players.is_empty() {
            return Err(SessionError::EmptyRoster);
        }

        let seats = self.players.len();
        self.roles.truncate(seats);
        while self.roles.len() < seats {
            self.roles.push(RoleId::Villager);
        }

        for player in &mut self.players {
            player.role_id = None;
            player.is_alive = true;
        }
        self.witch_potions = WitchPotions::default();
        self.lovers.clear();
        self.hunter_pending_shot = None;
        self.targets.clear();

        self.settings.status = Status::Playing;
        self.settings.cycle = 1;
        self.settings.phase = Phase::Night;
        self.settings.phase_step_index = 0;
        log::debug!("session {} started with {} players", self.id(), seats);
        Ok(())
    }

    /// Start over with a fresh session identity. `keep_players` retains the
    /// roster with roles, aliveness, and notes cleared.
    pub fn reset(&mut self, keep_players: bool) {
        self.settings = GameSettings {
            id: Uuid::new_v4(),
            status: Status::Setup,
            phase: Phase::Night,
            cycle: 0,
            phase_step_index: 0,
        };
        if keep_players {
            for player in &mut self.players {
                player.role_id = None;
                player.is_alive = true;
                player.notes.clear();
            }
        } else {
            self.players.clear();
        }
        self.targets.clear();
        self.lovers.clear();
        self.witch_potions = WitchPotions::default();
        self.hunter_pending_shot = None;
    }

    /// Mark the session ended. Never triggered automatically; win detection
    /// stays advisory.
    pub fn end_game(&mut self) {
        self.settings.status = Status::Ended;
    }

    // --- step navigation ---

    /// The current phase's step script.
    #[must_use]
    pub fn current_steps(&self) -> Vec<PhaseStep> {
        match self.settings.phase {
            Phase::Night => steps::night_steps(
                &self.players,
                self.settings.cycle,
                &self.roles,
                self.witch_potions,
            ),
            Phase::Day => steps::day_steps(self.hunter_pending_shot),
        }
    }

    /// Current position in the live script. Mutations that can shrink the
    /// script re-clamp the stored field, so this is normally a plain read;
    /// the clamp here is a second line against stale loaded documents.
    #[must_use]
    pub fn current_step_index(&self) -> usize {
        let len = self.current_steps().len();
        self.settings.phase_step_index.min(len.saturating_sub(1))
    }

    /// Re-clamp the stored index after a mutation that may have shrunk the
    /// current script (a role cleared, a holder dying, a hunter shot
    /// resolving). Keeps the serialized `phaseStepIndex` inside the script.
    fn clamp_step_index(&mut self) {
        let len = self.current_steps().len();
        if self.settings.phase_step_index >= len {
            self.settings.phase_step_index = len.saturating_sub(1);
        }
    }

    /// Jump to a specific step.
    ///
    /// # Errors
    ///
    /// An out-of-bounds index is a caller defect, rejected with
    /// [`SessionError::StepOutOfBounds`].
    pub fn set_step_index(&mut self, index: usize) -> Result<(), SessionError> {
        let len = self.current_steps().len();
        if index >= len {
            return Err(SessionError::StepOutOfBounds { index, len });
        }
        self.settings.phase_step_index = index;
        Ok(())
    }

    /// Move one step forward, saturating at the last step.
    pub fn advance_step(&mut self) {
        let len = self.current_steps().len();
        if self.settings.phase_step_index + 1 < len {
            self.settings.phase_step_index += 1;
        }
    }

    /// Move one step back, saturating at the first step.
    pub fn previous_step(&mut self) {
        self.settings.phase_step_index = self.settings.phase_step_index.saturating_sub(1);
    }

    // --- in-phase mutations ---

    /// Toggle a player's membership in a step's target selection.
    pub fn toggle_target(&mut self, step_id: &str, player: PlayerId) {
        let entry = self.targets.entry(step_id.to_string()).or_default();
        if let Some(pos) = entry.iter().position(|&id| id == player) {
            entry.remove(pos);
        } else {
            entry.push(player);
        }
        if entry.is_empty() {
            self.targets.remove(step_id);
        }
    }

    /// Assign (or clear) a role during the mapping ritual. Assignment
    /// revives the player per the player lifecycle.
    ///
    /// # Errors
    ///
    /// Rejects with [`SessionError::UnknownPlayer`] for an id outside the
    /// roster.
    pub fn assign_role(
        &mut self,
        id: PlayerId,
        role: Option<RoleId>,
    ) -> Result<(), SessionError> {
        let player = self.player_mut(id).ok_or(SessionError::UnknownPlayer(id))?;
        player.role_id = role;
        if role.is_some() {
            player.is_alive = true;
        }
        self.clamp_step_index();
        Ok(())
    }

    /// Direct aliveness mutation; this is how day-vote eliminations are
    /// applied. Night eliminations go through `advance_phase` instead.
    ///
    /// # Errors
    ///
    /// Rejects with [`SessionError::UnknownPlayer`] for an id outside the
    /// roster.
    pub fn set_alive(&mut self, id: PlayerId, alive: bool) -> Result<(), SessionError> {
        let player = self.player_mut(id).ok_or(SessionError::UnknownPlayer(id))?;
        player.is_alive = alive;
        self.clamp_step_index();
        Ok(())
    }

    /// Deal the reconciled pool to every still-unassigned player, shuffled
    /// with a seeded RNG. A quick alternative to walking the mapping steps
    /// by hand.
    pub fn deal_roles(&mut self, seed: u64) {
        if self.settings.status != Status::Playing {
            return;
        }
        let mut remaining = self.roles.clone();
        for player in &self.players {
            if let Some(role) = player.role_id {
                if let Some(pos) = remaining.iter().position(|&r| r == role) {
                    remaining.remove(pos);
                }
            }
        }
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        remaining.shuffle(&mut rng);
        for player in &mut self.players {
            if player.role_id.is_none() {
                player.role_id = remaining.pop();
            }
        }
    }

    // --- phase boundary ---

    /// Flip the phase. Night to day resolves the night and applies its
    /// deltas; day to night starts the next cycle with cleared selections.
    ///
    /// Returns the applied night result (with the lover chain-death
    /// extension folded in) for the morning announcement, `None` on a
    /// day-to-night flip or outside `Playing`.
    pub fn advance_phase(&mut self) -> Option<NightResult> {
        if self.settings.status != Status::Playing {
            return None;
        }
        match self.settings.phase {
            Phase::Night => {
                let mut result =
                    night::resolve_night(&self.players, &self.targets, self.witch_potions);

                if result.used_life_potion {
                    self.witch_potions.life = false;
                }
                if result.used_death_potion {
                    self.witch_potions.death = false;
                }

                if self.lovers.is_empty() {
                    if let Some([a, b]) = result.cupid_pair {
                        self.lovers = vec![a, b];
                    }
                }

                // Lover chain death: one half down drags the other, even
                // past a protection.
                if let [a, b] = self.lovers[..] {
                    let has_a = result.eliminated.contains(&a);
                    let has_b = result.eliminated.contains(&b);
                    if has_a && !has_b {
                        result.eliminated.push(b);
                    } else if has_b && !has_a {
                        result.eliminated.push(a);
                    }
                }

                for &id in &result.eliminated {
                    let newly_dead = self
                        .player(id)
                        .is_some_and(|p| p.is_alive && p.role_id == Some(RoleId::Hunter));
                    if newly_dead && self.hunter_pending_shot.is_none() {
                        self.hunter_pending_shot = Some(id);
                    }
                }

                for player in &mut self.players {
                    if result.eliminated.contains(&player.id) {
                        player.is_alive = false;
                    }
                }

                self.settings.phase = Phase::Day;
                self.settings.phase_step_index = 0;
                log::debug!(
                    "night {} resolved: {} eliminated, {} saved",
                    self.settings.cycle,
                    result.eliminated.len(),
                    result.saved.len()
                );
                Some(result)
            }
            Phase::Day => {
                self.settings.phase = Phase::Night;
                self.settings.cycle += 1;
                self.settings.phase_step_index = 0;
                self.targets.clear();
                log::debug!("entering night {}", self.settings.cycle);
                None
            }
        }
    }

    /// Apply the hunter's retaliation shot and clear the pending marker.
    /// With nothing pending this only clears the already-empty marker.
    pub fn resolve_hunter_shot(&mut self, target: PlayerId) {
        if self.hunter_pending_shot.is_some() {
            if let Some(player) = self.player_mut(target) {
                player.is_alive = false;
            }
        }
        self.hunter_pending_shot = None;
        // The day script just lost its retaliation step.
        self.clamp_step_index();
    }

    /// Advisory win check; never consulted by `advance_phase`.
    #[must_use]
    pub fn win(&self) -> Option<WinResult> {
        win::check_win(&self.players, &self.lovers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_players(count: usize) -> GameSession {
        let mut session = GameSession::new();
        session.generate_players(count);
        session
    }

    #[test]
    fn new_session_is_in_setup_at_cycle_zero() {
        let session = GameSession::new();
        assert_eq!(session.settings.status, Status::Setup);
        assert_eq!(session.settings.cycle, 0);
        assert_eq!(session.settings.phase, Phase::Night);
    }

    #[test]
    fn start_game_rejects_empty_roster() {
        let mut session = GameSession::new();
        assert_eq!(session.start_game(), Err(SessionError::EmptyRoster));
        assert_eq!(session.settings.status, Status::Setup);
    }

    #[test]
    fn start_game_pads_pool_with_villagers() {
        let mut session = session_with_players(5);
        session.roles = vec![RoleId::Werewolf, RoleId::Seer];
        session.start_game().unwrap();
        assert_eq!(session.roles.len(), 5);
        assert_eq!(
            session.roles.iter().filter(|&&r| r == RoleId::Villager).count(),
            3
        );
    }

    #[test]
    fn start_game_truncates_oversized_pool() {
        let mut session = session_with_players(2);
        session.roles = vec![
            RoleId::Werewolf,
            RoleId::Seer,
            RoleId::Doctor,
            RoleId::Witch,
        ];
        session.start_game().unwrap();
        assert_eq!(session.roles, vec![RoleId::Werewolf, RoleId::Seer]);
    }

    #[test]
    fn start_game_clears_assignments_and_consumables() {
        let mut session = session_with_players(3);
        session.roles = vec![RoleId::Werewolf];
        session.start_game().unwrap();
        let witch = session.players[0].id;
        session.assign_role(witch, Some(RoleId::Witch)).unwrap();
        session.witch_potions.life = false;
        session.lovers = vec![session.players[1].id, session.players[2].id];

        session.reset(true);
        session.start_game().unwrap();
        assert!(session.players.iter().all(|p| p.role_id.is_none()));
        assert!(session.witch_potions.life && session.witch_potions.death);
        assert!(session.lovers.is_empty());
        assert_eq!(session.settings.cycle, 1);
    }

    #[test]
    fn roster_configuration_is_setup_only() {
        let mut session = session_with_players(3);
        session.start_game().unwrap();
        let before = session.players.clone();

        assert!(session.add_player("late joiner").is_none());
        session.remove_player(before[0].id);
        session.rename_player(before[0].id, "renamed");
        session.generate_players(2);
        session.add_pool_role(RoleId::Cupid);
        session.remove_pool_role(RoleId::Werewolf);

        assert_eq!(session.players, before);
        assert_eq!(session.roles.len(), 3);
        assert!(!session.roles.contains(&RoleId::Cupid));
    }

    #[test]
    fn remove_pool_role_drops_last_occurrence() {
        let mut session = GameSession::new();
        session.roles = vec![RoleId::Werewolf, RoleId::Seer, RoleId::Werewolf];
        session.remove_pool_role(RoleId::Werewolf);
        assert_eq!(session.roles, vec![RoleId::Werewolf, RoleId::Seer]);
    }

    #[test]
    fn step_navigation_stays_in_bounds() {
        let mut session = session_with_players(4);
        session.roles = vec![RoleId::Werewolf, RoleId::Seer];
        session.start_game().unwrap();
        let len = session.current_steps().len();

        session.previous_step();
        assert_eq!(session.settings.phase_step_index, 0);
        for _ in 0..len + 5 {
            session.advance_step();
        }
        assert_eq!(session.settings.phase_step_index, len - 1);
        assert!(matches!(
            session.set_step_index(len),
            Err(SessionError::StepOutOfBounds { .. })
        ));
        session.set_step_index(1).unwrap();
        assert_eq!(session.current_step_index(), 1);
    }

    #[test]
    fn toggle_target_adds_and_removes() {
        let mut session = session_with_players(2);
        session.start_game().unwrap();
        let target = session.players[0].id;
        session.toggle_target("night-werewolf", target);
        assert_eq!(session.targets["night-werewolf"], vec![target]);
        session.toggle_target("night-werewolf", target);
        assert!(!session.targets.contains_key("night-werewolf"));
    }

    #[test]
    fn deal_roles_assigns_reconciled_pool() {
        let mut session = session_with_players(6);
        session.roles = vec![RoleId::Werewolf, RoleId::Seer, RoleId::Doctor];
        session.start_game().unwrap();
        // Pre-assign one player by hand; dealing must respect it.
        let seer = session.players[0].id;
        session.assign_role(seer, Some(RoleId::Seer)).unwrap();
        session.deal_roles(42);

        assert!(session.players.iter().all(|p| p.role_id.is_some()));
        let mut dealt: Vec<RoleId> = session.players.iter().filter_map(|p| p.role_id).collect();
        let mut expected = session.roles.clone();
        dealt.sort_by_key(|r| r.as_str());
        expected.sort_by_key(|r| r.as_str());
        assert_eq!(dealt, expected);
    }

    #[test]
    fn deal_roles_is_deterministic_per_seed() {
        let mut a = session_with_players(8);
        a.roles = vec![RoleId::Werewolf, RoleId::Werewolf, RoleId::Seer];
        a.start_game().unwrap();
        let mut b = a.clone();
        a.deal_roles(7);
        b.deal_roles(7);
        assert_eq!(a.players, b.players);
    }

    #[test]
    fn day_to_night_increments_cycle_and_clears_targets() {
        let mut session = session_with_players(3);
        session.start_game().unwrap();
        session.toggle_target("night-werewolf", session.players[0].id);
        assert!(session.advance_phase().is_some());
        assert_eq!(session.settings.phase, Phase::Day);

        session.toggle_target("day-vote", session.players[1].id);
        assert!(session.advance_phase().is_none());
        assert_eq!(session.settings.phase, Phase::Night);
        assert_eq!(session.settings.cycle, 2);
        assert!(session.targets.is_empty());
        assert_eq!(session.settings.phase_step_index, 0);
    }

    #[test]
    fn advance_phase_outside_playing_is_a_no_op() {
        let mut session = session_with_players(3);
        assert!(session.advance_phase().is_none());
        assert_eq!(session.settings.phase, Phase::Night);
        assert_eq!(session.settings.cycle, 0);
    }

    #[test]
    fn night_resolution_consumes_potions() {
        let mut session = session_with_players(4);
        session.roles = vec![RoleId::Werewolf, RoleId::Witch];
        session.start_game().unwrap();
        session.deal_roles(1);
        let victim = session.players[0].id;
        session.toggle_target(steps::STEP_NIGHT_WITCH_KILL, victim);
        session.advance_phase();
        assert!(!session.witch_potions.death);
        assert!(session.witch_potions.life);
    }

    #[test]
    fn hunter_death_at_night_pends_the_shot() {
        let mut session = session_with_players(4);
        session.roles = vec![RoleId::Werewolf, RoleId::Hunter];
        session.start_game().unwrap();
        let hunter = session.players[0].id;
        session.assign_role(hunter, Some(RoleId::Hunter)).unwrap();
        session.deal_roles(3);
        session.toggle_target(steps::STEP_NIGHT_WEREWOLF, hunter);
        session.advance_phase();

        assert_eq!(session.hunter_pending_shot, Some(hunter));
        assert!(!session.player(hunter).unwrap().is_alive);

        let target = session.players[1].id;
        session.resolve_hunter_shot(target);
        assert!(!session.player(target).unwrap().is_alive);
        assert_eq!(session.hunter_pending_shot, None);
    }

    #[test]
    fn hunter_shot_clamps_stored_index_when_day_script_shrinks() {
        let mut session = session_with_players(4);
        session.roles = vec![RoleId::Werewolf, RoleId::Hunter];
        session.start_game().unwrap();
        let hunter = session.players[0].id;
        session.assign_role(hunter, Some(RoleId::Hunter)).unwrap();
        session.deal_roles(3);
        session.toggle_target(steps::STEP_NIGHT_WEREWOLF, hunter);
        session.advance_phase();

        // Sit on the last day step, then resolve the shot: the script
        // drops from five steps to four.
        let len = session.current_steps().len();
        session.set_step_index(len - 1).unwrap();
        session.resolve_hunter_shot(session.players[1].id);

        let new_len = session.current_steps().len();
        assert_eq!(new_len, len - 1);
        assert!(session.settings.phase_step_index < new_len);
    }

    #[test]
    fn witch_death_clamps_stored_index_when_night_script_shrinks() {
        let mut session = session_with_players(4);
        session.roles = vec![RoleId::Werewolf, RoleId::Witch];
        session.start_game().unwrap();
        session.deal_roles(6);
        // Skip past night 1 so the script has no mapping steps.
        session.advance_phase();
        session.advance_phase();

        let witch = session
            .players
            .iter()
            .find(|p| p.role_id == Some(RoleId::Witch))
            .unwrap()
            .id;
        let len = session.current_steps().len();
        session.set_step_index(len - 1).unwrap();
        // A dead witch collapses two potion steps into one placeholder.
        session.set_alive(witch, false).unwrap();

        let new_len = session.current_steps().len();
        assert_eq!(new_len, len - 1);
        assert!(session.settings.phase_step_index < new_len);
    }

    #[test]
    fn hunter_shot_with_nothing_pending_only_clears_marker() {
        let mut session = session_with_players(2);
        session.start_game().unwrap();
        let target = session.players[0].id;
        session.resolve_hunter_shot(target);
        assert!(session.player(target).unwrap().is_alive);
    }

    #[test]
    fn reset_keeps_or_clears_roster() {
        let mut session = session_with_players(4);
        session.start_game().unwrap();
        session.deal_roles(5);
        let old_id = session.id();

        let mut kept = session.clone();
        kept.reset(true);
        assert_ne!(kept.id(), old_id);
        assert_eq!(kept.settings.status, Status::Setup);
        assert_eq!(kept.settings.cycle, 0);
        assert_eq!(kept.players.len(), 4);
        assert!(kept.players.iter().all(|p| p.role_id.is_none() && p.is_alive));

        session.reset(false);
        assert!(session.players.is_empty());
    }
}
