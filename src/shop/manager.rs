use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info};
use serde::Serialize;
use uuid::Uuid;

use super::mode::ShopMode;
use super::session::ShopSession;
use crate::item::ActorId;

/// Sent to an actor whenever their session changes mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeNotice {
    pub actor: ActorId,
    pub mode: ShopMode,
    pub instructions: &'static str,
}

/// Registry of per-actor shop sessions.
///
/// The map sits behind an `RwLock` so background tasks (cleanup sweeps, name
/// caches) can read it while the event thread writes. Get-or-create happens
/// under the write lock, so two back-to-back events for the same actor can
/// never both create a session.
#[derive(Clone, Default)]
pub struct ShopManager {
    sessions: Arc<RwLock<HashMap<ActorId, ShopSession>>>,
}

impl ShopManager {
    pub fn new() -> Self {
        debug!("ShopManager initialized");
        Self::default()
    }

    /// Snapshot of the actor's session, creating it on first use.
    pub fn session(&self, actor: ActorId) -> ShopSession {
        {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(session) = sessions.get(&actor) {
                return session.clone();
            }
        }
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(actor)
            .or_insert_with(|| {
                debug!("Created new shop session for {}", actor);
                ShopSession::new(actor)
            })
            .clone()
    }

    /// Applies `f` to the actor's session (created if absent) and returns its result.
    pub fn update<R>(&self, actor: ActorId, f: impl FnOnce(&mut ShopSession) -> R) -> R {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.entry(actor).or_insert_with(|| {
            debug!("Created new shop session for {}", actor);
            ShopSession::new(actor)
        });
        f(session)
    }

    pub fn has_session(&self, actor: &ActorId) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(actor)
    }

    /// Removes the actor's session, cleaned. No-op for unknown actors.
    pub fn remove_session(&self, actor: &ActorId) -> Option<ShopSession> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(actor);
        removed.map(|mut session| {
            session.cleanup();
            debug!("Removed shop session for {}", actor);
            session
        })
    }

    pub fn set_session_mode(&self, actor: ActorId, mode: ShopMode) -> ModeNotice {
        debug!("Setting mode {} for {}", mode, actor);
        self.transition(actor, mode)
    }

    /// Entry point used by sign interactions; same effect as [`Self::set_session_mode`].
    pub fn handle_interaction(&self, actor: ActorId, mode: ShopMode) -> ModeNotice {
        debug!("Handling sign interaction for {} with mode {}", actor, mode);
        self.transition(actor, mode)
    }

    fn transition(&self, actor: ActorId, mode: ShopMode) -> ModeNotice {
        self.update(actor, |session| session.set_mode(mode));
        ModeNotice {
            actor,
            mode,
            instructions: mode.instructions(),
        }
    }

    pub fn active_sessions(&self) -> HashMap<ActorId, ShopSession> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops every session bound to `shop_id` (ownership change, shop deleted).
    pub fn invalidate_shop(&self, shop_id: &Uuid) -> Vec<ActorId> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let bound: Vec<ActorId> = sessions
            .values()
            .filter(|s| s.is_configuring(shop_id))
            .map(|s| s.actor)
            .collect();
        for actor in &bound {
            sessions.remove(actor);
            debug!("Invalidated shop session for {} on shop {}", actor, shop_id);
        }
        bound
    }

    /// Removes sessions idle for longer than `timeout_minutes`.
    pub fn prune_inactive(&self, timeout_minutes: i64) -> Vec<ActorId> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let idle: Vec<ActorId> = sessions
            .values()
            .filter(|s| s.is_inactive(timeout_minutes))
            .map(|s| s.actor)
            .collect();
        for actor in &idle {
            sessions.remove(actor);
        }
        if !idle.is_empty() {
            debug!("Pruned {} idle shop session(s)", idle.len());
        }
        idle
    }

    /// Clears every session. Used at shutdown.
    pub fn cleanup_all(&self) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let count = sessions.len();
        sessions.values_mut().for_each(ShopSession::cleanup);
        sessions.clear();
        info!("ShopManager cleanup completed ({} sessions)", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Location;

    #[test]
    fn session_is_get_or_create() {
        let manager = ShopManager::new();
        let actor = ActorId::new();
        let first = manager.session(actor);
        assert_eq!(first.mode(), None);

        manager.set_session_mode(actor, ShopMode::Type);
        let second = manager.session(actor);
        assert_eq!(second.mode(), Some(ShopMode::Type));
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(manager.session_count(), 1);
    }

    #[test]
    fn both_entry_points_behave_the_same() {
        let manager = ShopManager::new();
        let a = ActorId::new();
        let b = ActorId::new();
        let na = manager.set_session_mode(a, ShopMode::Delete);
        let nb = manager.handle_interaction(b, ShopMode::Delete);
        assert_eq!(na.mode, nb.mode);
        assert_eq!(na.instructions, nb.instructions);
        assert_eq!(manager.session(a).mode(), manager.session(b).mode());
    }

    #[test]
    fn remove_is_noop_for_unknown_actor() {
        let manager = ShopManager::new();
        assert!(manager.remove_session(&ActorId::new()).is_none());

        let actor = ActorId::new();
        manager.set_session_mode(actor, ShopMode::Board);
        let removed = manager.remove_session(&actor).unwrap();
        assert_eq!(removed.mode(), None);
        assert!(!manager.has_session(&actor));
    }

    #[test]
    fn invalidate_shop_removes_bound_sessions_only() {
        let manager = ShopManager::new();
        let shop = Uuid::new_v4();
        let bound = ActorId::new();
        let other = ActorId::new();
        manager.update(bound, |s| s.set_active_sign(shop, Location::new("w", 0, 0, 0)));
        manager.update(other, |s| s.set_mode(ShopMode::Help));

        assert_eq!(manager.invalidate_shop(&shop), vec![bound]);
        assert!(!manager.has_session(&bound));
        assert!(manager.has_session(&other));
    }

    #[test]
    fn prune_inactive_sessions() {
        let manager = ShopManager::new();
        let idle = ActorId::new();
        let busy = ActorId::new();
        manager.update(idle, |s| {
            s.last_activity = chrono::Utc::now() - chrono::Duration::minutes(30)
        });
        manager.session(busy);
        assert_eq!(manager.prune_inactive(10), vec![idle]);
        assert_eq!(manager.session_count(), 1);
    }

    #[test]
    fn concurrent_get_or_create_yields_one_session() {
        let manager = ShopManager::new();
        let actor = ActorId::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                std::thread::spawn(move || manager.session(actor).created_at)
            })
            .collect();
        let stamps: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(stamps.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(manager.session_count(), 1);
    }

    #[test]
    fn cleanup_all_empties_registry() {
        let manager = ShopManager::new();
        for _ in 0..3 {
            manager.session(ActorId::new());
        }
        manager.cleanup_all();
        assert_eq!(manager.session_count(), 0);
    }
}
