//! Registry of open WebSocket connections, grouped by chat id.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use uuid::Uuid;

/// Server-generated identifier for one WebSocket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// chat id → set of active connections.
#[derive(Default)]
pub struct ConnectionRegistry {
    active: Mutex<HashMap<String, HashSet<ConnectionId>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection under `chat_id`.
    pub fn register(&self, chat_id: &str) -> ConnectionId {
        let id = ConnectionId::new();
        self.active
            .lock()
            .entry(chat_id.to_string())
            .or_default()
            .insert(id);
        id
    }

    /// Register a connection that stays registered until the guard is dropped.
    pub fn register_guarded(&self, chat_id: &str) -> ConnectionGuard<'_> {
        ConnectionGuard {
            registry: self,
            chat_id: chat_id.to_string(),
            id: self.register(chat_id),
        }
    }

    /// Remove a connection. Empty chat entries are dropped.
    pub fn unregister(&self, chat_id: &str, id: ConnectionId) {
        let mut active = self.active.lock();
        if let Some(set) = active.get_mut(chat_id) {
            set.remove(&id);
            if set.is_empty() {
                active.remove(chat_id);
            }
        }
    }

    pub fn contains(&self, chat_id: &str, id: ConnectionId) -> bool {
        self.active
            .lock()
            .get(chat_id)
            .is_some_and(|set| set.contains(&id))
    }

    /// Number of open connections for a chat.
    pub fn count(&self, chat_id: &str) -> usize {
        self.active.lock().get(chat_id).map_or(0, HashSet::len)
    }
}

/// Unregisters its connection on drop, including while unwinding.
pub struct ConnectionGuard<'a> {
    registry: &'a ConnectionRegistry,
    chat_id: String,
    id: ConnectionId,
}

impl ConnectionGuard<'_> {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard<'_> {
    fn drop(&mut self) {
        self.registry.unregister(&self.chat_id, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_unregister() {
        let registry = ConnectionRegistry::new();
        let a = registry.register("c1");
        let b = registry.register("c1");
        assert_ne!(a, b);
        assert_eq!(registry.count("c1"), 2);
        assert!(registry.contains("c1", a));

        registry.unregister("c1", a);
        assert!(!registry.contains("c1", a));
        assert!(registry.contains("c1", b));

        registry.unregister("c1", b);
        assert_eq!(registry.count("c1"), 0);
        assert!(registry.active.lock().is_empty());
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let registry = ConnectionRegistry::new();
        let id = registry.register("c1");
        registry.unregister("c2", id);
        registry.unregister("c1", ConnectionId::new());
        assert!(registry.contains("c1", id));
    }

    #[test]
    fn test_guard_unregisters_on_drop() {
        let registry = ConnectionRegistry::new();
        let guard = registry.register_guarded("c1");
        let id = guard.id();
        assert!(registry.contains("c1", id));

        drop(guard);
        assert!(!registry.contains("c1", id));
        assert!(registry.active.lock().is_empty());
    }

    #[test]
    fn test_guard_unregisters_on_panic() {
        let registry = ConnectionRegistry::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = registry.register_guarded("c1");
            assert_eq!(registry.count("c1"), 1);
            panic!("handler blew up");
        }));
        assert!(result.is_err());
        assert_eq!(registry.count("c1"), 0);
    }
}
