//! Persistence and identity boundary contracts.
//!
//! The core never talks to a backend directly: platform code implements
//! [`SessionStore`] and [`IdentityProvider`], and the engine in `lib.rs`
//! composes them. Saves are best-effort and debounced; the in-memory
//! session stays the source of truth either way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::session::{GameSession, Phase, SessionId, Status};
use crate::story::StoryId;

/// Whoever is driving the moderator UI. Every session is owned by the
/// principal that last wrote it; there is no sharing model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub anonymous: bool,
}

impl Principal {
    #[must_use]
    pub fn anonymous(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            anonymous: true,
        }
    }
}

/// Trait for abstracting sign-in state.
/// Platform-specific implementations should provide this.
pub trait IdentityProvider {
    /// The signed-in principal, if any.
    fn current(&self) -> Option<Principal>;

    /// Create (or reuse) an anonymous principal.
    fn sign_in_anonymously(&self) -> Principal;
}

/// Read-only projection of a stored session for the resume list. Never used
/// to mutate anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: SessionId,
    pub updated_at: DateTime<Utc>,
    pub status: Status,
    pub phase: Phase,
    pub cycle: u32,
    pub alive_count: usize,
    pub player_count: usize,
    pub story_id: StoryId,
}

impl SessionSummary {
    /// Project a session at a given write time.
    #[must_use]
    pub fn capture(session: &GameSession, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: session.id(),
            updated_at,
            status: session.settings.status,
            phase: session.settings.phase,
            cycle: session.settings.cycle,
            alive_count: session.alive_count(),
            player_count: session.players.len(),
            story_id: session.story_id,
        }
    }
}

/// One page of a summary listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPage {
    pub items: Vec<SessionSummary>,
    pub total_pages: usize,
}

/// Trait for abstracting session persistence.
/// Platform-specific implementations should provide this.
pub trait SessionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a session document.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport/storage faults; a missing
    /// session is `Ok(None)`.
    fn get(&self, id: SessionId) -> Result<Option<GameSession>, Self::Error>;

    /// Write a session document, overwriting any earlier copy
    /// (last-write-wins, no concurrency token).
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected; callers treat this as
    /// best-effort and keep the in-memory state authoritative.
    fn put(&self, owner: &Principal, session: &GameSession) -> Result<(), Self::Error>;

    /// List the owner's sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error for transport/storage faults.
    fn list(
        &self,
        owner: &Principal,
        page: usize,
        page_size: usize,
    ) -> Result<SummaryPage, Self::Error>;
}

/// In-memory store, the reference implementation and test double.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<SessionId, StoredSession>>,
}

#[derive(Debug, Clone)]
struct StoredSession {
    owner: String,
    updated_at: DateTime<Utc>,
    session: GameSession,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    type Error = std::convert::Infallible;

    fn get(&self, id: SessionId) -> Result<Option<GameSession>, Self::Error> {
        let sessions = self.sessions.lock().expect("store mutex poisoned");
        Ok(sessions.get(&id).map(|s| s.session.clone()))
    }

    fn put(&self, owner: &Principal, session: &GameSession) -> Result<(), Self::Error> {
        let mut sessions = self.sessions.lock().expect("store mutex poisoned");
        sessions.insert(
            session.id(),
            StoredSession {
                owner: owner.id.clone(),
                updated_at: Utc::now(),
                session: session.clone(),
            },
        );
        Ok(())
    }

    fn list(
        &self,
        owner: &Principal,
        page: usize,
        page_size: usize,
    ) -> Result<SummaryPage, Self::Error> {
        let sessions = self.sessions.lock().expect("store mutex poisoned");
        let mut owned: Vec<&StoredSession> = sessions
            .values()
            .filter(|s| s.owner == owner.id)
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let total_pages = if page_size == 0 {
            0
        } else {
            owned.len().div_ceil(page_size)
        };
        let items = owned
            .into_iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .map(|s| SessionSummary::capture(&s.session, s.updated_at))
            .collect();
        Ok(SummaryPage { items, total_pages })
    }
}

/// Debounce configuration for the fire-and-forget save path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncePolicy {
    /// Quiet period that must elapse after the last mutation before the
    /// durable copy is refreshed.
    pub quiet: Duration,
}

impl Default for DebouncePolicy {
    fn default() -> Self {
        Self {
            quiet: Duration::from_millis(750),
        }
    }
}

/// Clock-injected debounce gate. A burst of mutations keeps pushing the
/// deadline out; the durable copy may lag in-memory state by at most one
/// quiet window. Later marks supersede earlier ones (last-write-wins at the
/// timer).
#[derive(Debug, Clone)]
pub struct SaveScheduler {
    policy: DebouncePolicy,
    dirty_at: Option<Instant>,
}

impl SaveScheduler {
    #[must_use]
    pub const fn new(policy: DebouncePolicy) -> Self {
        Self {
            policy,
            dirty_at: None,
        }
    }

    /// Record a mutation at `now`, restarting the quiet window.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty_at = Some(now);
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty_at.is_some()
    }

    /// Whether the quiet window has elapsed.
    #[must_use]
    pub fn due(&self, now: Instant) -> bool {
        self.dirty_at
            .is_some_and(|at| now.duration_since(at) >= self.policy.quiet)
    }

    /// Consume the pending save if it is due. Returns whether the caller
    /// should write now.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.due(now) {
            self.dirty_at = None;
            true
        } else {
            false
        }
    }
}
