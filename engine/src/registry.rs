//! Live session registry.
//!
//! Maps a [`SessionKey`] to exactly one in-flight game. The outer map lock
//! covers lookups and the whole creation sequence; each session carries its
//! own lock so actions on the same key serialize without blocking the map.

use crate::games::GameSession;
use anyhow::{anyhow, Result};
use pitboss_types::{GameError, SessionKey};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionKey, Arc<Mutex<GameSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> Result<MutexGuard<'_, HashMap<SessionKey, Arc<Mutex<GameSession>>>>> {
        self.sessions
            .lock()
            .map_err(|_| anyhow!("session registry poisoned"))
    }

    /// Create a session under the map lock. `build` runs only when the key
    /// is free, so the debit it performs and the insertion are all-or-
    /// nothing with respect to other creations on the same key.
    pub fn create_with<F>(
        &self,
        key: SessionKey,
        build: F,
    ) -> Result<Result<Arc<Mutex<GameSession>>, GameError>>
    where
        F: FnOnce() -> Result<Result<GameSession, GameError>>,
    {
        let mut map = self.map()?;
        if map.contains_key(&key) {
            return Ok(Err(GameError::DuplicateSession));
        }
        let session = match build()? {
            Ok(session) => session,
            Err(err) => return Ok(Err(err)),
        };
        let slot = Arc::new(Mutex::new(session));
        map.insert(key, slot.clone());
        Ok(Ok(slot))
    }

    /// Swap the session stored under an existing key. `build` runs under the
    /// map lock; a failure leaves the previous session in place.
    pub fn replace_with<F>(
        &self,
        key: SessionKey,
        build: F,
    ) -> Result<Result<Arc<Mutex<GameSession>>, GameError>>
    where
        F: FnOnce() -> Result<Result<GameSession, GameError>>,
    {
        let mut map = self.map()?;
        if !map.contains_key(&key) {
            return Ok(Err(GameError::SessionNotFound));
        }
        let session = match build()? {
            Ok(session) => session,
            Err(err) => return Ok(Err(err)),
        };
        let slot = Arc::new(Mutex::new(session));
        map.insert(key, slot.clone());
        Ok(Ok(slot))
    }

    pub fn get(&self, key: SessionKey) -> Result<Option<Arc<Mutex<GameSession>>>> {
        Ok(self.map()?.get(&key).cloned())
    }

    pub fn remove(&self, key: SessionKey) -> Result<Option<Arc<Mutex<GameSession>>>> {
        Ok(self.map()?.remove(&key))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.map()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.map()?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{GameRng, MinesGame};

    fn key(user: u64, message: u64) -> SessionKey {
        SessionKey::new(user, message)
    }

    fn mines_session(seed: u64) -> GameSession {
        let mut rng = GameRng::from_seed(seed);
        GameSession::Mines(MinesGame::new(100, 5, &mut rng).expect("valid game"))
    }

    #[test]
    fn create_then_get_returns_the_same_session() {
        let registry = SessionRegistry::new();
        let created = registry
            .create_with(key(1, 1), || Ok(Ok(mines_session(1))))
            .expect("infra")
            .expect("created");
        let fetched = registry.get(key(1, 1)).expect("infra").expect("present");
        assert!(Arc::ptr_eq(&created, &fetched));
    }

    #[test]
    fn duplicate_key_is_rejected_without_running_build() {
        let registry = SessionRegistry::new();
        registry
            .create_with(key(1, 1), || Ok(Ok(mines_session(1))))
            .expect("infra")
            .expect("created");

        let result = registry
            .create_with(key(1, 1), || panic!("build must not run"))
            .expect("infra");
        assert!(matches!(result, Err(GameError::DuplicateSession)));
        assert_eq!(registry.len().expect("infra"), 1);
    }

    #[test]
    fn failed_build_leaves_no_entry() {
        let registry = SessionRegistry::new();
        let result = registry
            .create_with(key(1, 1), || Ok(Err(GameError::InsufficientBalance)))
            .expect("infra");
        assert!(matches!(result, Err(GameError::InsufficientBalance)));
        assert!(registry.is_empty().expect("infra"));
    }

    #[test]
    fn replace_requires_an_existing_session() {
        let registry = SessionRegistry::new();
        let result = registry
            .replace_with(key(1, 1), || Ok(Ok(mines_session(1))))
            .expect("infra");
        assert!(matches!(result, Err(GameError::SessionNotFound)));
    }

    #[test]
    fn replace_swaps_the_stored_session() {
        let registry = SessionRegistry::new();
        let first = registry
            .create_with(key(1, 1), || Ok(Ok(mines_session(1))))
            .expect("infra")
            .expect("created");
        let second = registry
            .replace_with(key(1, 1), || Ok(Ok(mines_session(2))))
            .expect("infra")
            .expect("replaced");
        assert!(!Arc::ptr_eq(&first, &second));

        let fetched = registry.get(key(1, 1)).expect("infra").expect("present");
        assert!(Arc::ptr_eq(&second, &fetched));
    }

    #[test]
    fn failed_replace_keeps_the_previous_session() {
        let registry = SessionRegistry::new();
        let first = registry
            .create_with(key(1, 1), || Ok(Ok(mines_session(1))))
            .expect("infra")
            .expect("created");
        let result = registry
            .replace_with(key(1, 1), || Ok(Err(GameError::InsufficientBalance)))
            .expect("infra");
        assert!(matches!(result, Err(GameError::InsufficientBalance)));

        let fetched = registry.get(key(1, 1)).expect("infra").expect("present");
        assert!(Arc::ptr_eq(&first, &fetched));
    }

    #[test]
    fn remove_frees_the_key_for_reuse() {
        let registry = SessionRegistry::new();
        registry
            .create_with(key(1, 1), || Ok(Ok(mines_session(1))))
            .expect("infra")
            .expect("created");
        assert!(registry.remove(key(1, 1)).expect("infra").is_some());
        assert!(registry.get(key(1, 1)).expect("infra").is_none());

        registry
            .create_with(key(1, 1), || Ok(Ok(mines_session(2))))
            .expect("infra")
            .expect("recreated");
    }

    #[test]
    fn same_user_holds_independent_sessions_per_message() {
        let registry = SessionRegistry::new();
        registry
            .create_with(key(1, 10), || Ok(Ok(mines_session(1))))
            .expect("infra")
            .expect("created");
        registry
            .create_with(key(1, 11), || Ok(Ok(mines_session(2))))
            .expect("infra")
            .expect("created");
        assert_eq!(registry.len().expect("infra"), 2);
    }
}
