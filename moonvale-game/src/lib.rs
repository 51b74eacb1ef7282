//! Moonvale Moderator Engine
//!
//! Platform-agnostic core logic for running a moderated werewolf night at a
//! real table. This crate owns the phase/step progression engine, night
//! resolution, win evaluation, and the session aggregate; rendering,
//! routing, translation, and the storage backend live elsewhere and plug in
//! through the traits in [`store`].

pub mod night;
pub mod roles;
pub mod session;
pub mod steps;
pub mod store;
pub mod story;
pub mod suggest;
pub mod win;

// Re-export commonly used types
pub use night::{resolve_night, NightResult};
pub use roles::{Faction, Role, RoleId, ROLES};
pub use session::{
    GameSession, GameSettings, Phase, Player, PlayerId, SessionError, SessionId, Status,
    WitchPotions,
};
pub use steps::{day_steps, night_steps, PhaseStep, StepKind};
pub use store::{
    DebouncePolicy, IdentityProvider, MemorySessionStore, Principal, SaveScheduler, SessionStore,
    SessionSummary, SummaryPage,
};
pub use story::{DescriptionSource, StoryId, StoryVibe, STORIES};
pub use suggest::suggest_roles;
pub use win::{check_win, WinResult};

use std::time::Instant;

/// Composition root binding a session store and an identity provider to the
/// debounced save policy.
pub struct ModeratorEngine<S, I>
where
    S: SessionStore,
    I: IdentityProvider,
{
    store: S,
    identity: I,
    scheduler: SaveScheduler,
}

impl<S, I> ModeratorEngine<S, I>
where
    S: SessionStore,
    I: IdentityProvider,
{
    pub fn new(store: S, identity: I, policy: DebouncePolicy) -> Self {
        Self {
            store,
            identity,
            scheduler: SaveScheduler::new(policy),
        }
    }

    /// Load a session, falling back to a fresh setup-status session on a
    /// miss or a storage fault. Load failure is never an error the UI has
    /// to handle; it is logged and absorbed.
    pub fn load_or_default(&self, id: SessionId) -> GameSession {
        match self.store.get(id) {
            Ok(Some(session)) => session,
            Ok(None) => GameSession::new(),
            Err(err) => {
                log::warn!("session load failed for {id}: {err}");
                GameSession::new()
            }
        }
    }

    /// The acting principal, signing in anonymously when nobody is.
    pub fn principal(&self) -> Principal {
        self.identity
            .current()
            .unwrap_or_else(|| self.identity.sign_in_anonymously())
    }

    /// Record a mutation for the debounced save path.
    pub fn note_mutation(&mut self, now: Instant) {
        self.scheduler.mark_dirty(now);
    }

    /// Write the durable copy if the quiet window has elapsed. Best-effort:
    /// a rejected write is logged, never rolled back into the session.
    pub fn flush_if_due(&mut self, now: Instant, session: &GameSession) {
        if self.scheduler.take_due(now) {
            self.save(session);
        }
    }

    /// Unconditional best-effort save (session load points and explicit
    /// "save now" affordances).
    pub fn save(&self, session: &GameSession) {
        let owner = self.principal();
        if let Err(err) = self.store.put(&owner, session) {
            log::warn!("session save failed for {}: {err}", session.id());
        }
    }

    /// Resume-list page for the acting principal.
    ///
    /// # Errors
    ///
    /// Propagates storage faults; the resume list is the one surface where
    /// the caller may want to show a retry.
    pub fn summaries(&self, page: usize, page_size: usize) -> anyhow::Result<SummaryPage>
    where
        S::Error: Into<anyhow::Error>,
    {
        let owner = self.principal();
        self.store
            .list(&owner, page, page_size)
            .map_err(Into::into)
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct AnonIdentity;

    impl IdentityProvider for AnonIdentity {
        fn current(&self) -> Option<Principal> {
            None
        }

        fn sign_in_anonymously(&self) -> Principal {
            Principal::anonymous("anon")
        }
    }

    fn engine() -> ModeratorEngine<MemorySessionStore, AnonIdentity> {
        ModeratorEngine::new(
            MemorySessionStore::new(),
            AnonIdentity,
            DebouncePolicy::default(),
        )
    }

    #[test]
    fn missing_session_falls_back_to_setup_default() {
        let engine = engine();
        let session = engine.load_or_default(SessionId::new_v4());
        assert_eq!(session.settings.status, Status::Setup);
        assert_eq!(session.settings.cycle, 0);
        assert!(session.players.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let engine = engine();
        let mut session = GameSession::new();
        session.generate_players(5);
        session.start_game().unwrap();
        engine.save(&session);

        let loaded = engine.load_or_default(session.id());
        assert_eq!(loaded, session);
    }

    #[test]
    fn debounced_flush_writes_after_quiet_window() {
        let mut engine = ModeratorEngine::new(
            MemorySessionStore::new(),
            AnonIdentity,
            DebouncePolicy {
                quiet: Duration::from_millis(10),
            },
        );
        let session = GameSession::new();
        let start = Instant::now();

        engine.note_mutation(start);
        engine.flush_if_due(start, &session);
        assert!(engine.store().get(session.id()).unwrap().is_none());

        engine.flush_if_due(start + Duration::from_millis(20), &session);
        assert!(engine.store().get(session.id()).unwrap().is_some());
    }

    #[test]
    fn summaries_page_for_the_acting_principal() {
        let engine = engine();
        let mut session = GameSession::new();
        session.generate_players(2);
        engine.save(&session);

        let page = engine.summaries(0, 10).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, session.id());
        assert_eq!(page.items[0].player_count, 2);
    }
}
