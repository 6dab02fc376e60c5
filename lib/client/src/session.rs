//! Authenticated session state and its durable snapshot.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use campus_kv::KVStore;

/// Key the session snapshot is stored under in the kv store.
pub const SESSION_KEY: &str = "auth:session";

/// The authenticated identity held between login and logout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,

    /// Cookie token for the Session dialect. The Service dialect issues
    /// none — the uid alone identifies the login there.
    #[serde(default)]
    pub session_token: Option<String>,

    pub username: String,
    pub database: String,

    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub partner_id: Option<i64>,
}

/// Single source of truth for "am I logged in, and as whom".
///
/// Explicitly constructed over an injected kv store; composition roots
/// share one instance between the transport and whatever owns
/// login/logout. The in-memory session mirrors a JSON snapshot under
/// [`SESSION_KEY`], so a freshly built store can recover the previous
/// login after a restart.
pub struct SessionStore {
    kv: Arc<dyn KVStore>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self {
            kv,
            current: RwLock::new(None),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Current session, if hydrated. Does not touch the snapshot.
    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// True when a session is live, restoring once from the durable
    /// snapshot if this store was rebuilt since the last login.
    pub fn check_auth(&self) -> bool {
        if self.read().is_some() {
            return true;
        }
        match self.restore() {
            Some(session) => {
                tracing::debug!("session restored for {}", session.username);
                *self.write() = Some(session);
                true
            }
            None => false,
        }
    }

    /// One snapshot read. Absent or malformed content is "no session".
    fn restore(&self) -> Option<Session> {
        let bytes = match self.kv.get(SESSION_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("session snapshot read failed: {}", e);
                return None;
            }
        };
        match serde_json::from_slice::<Session>(&bytes) {
            Ok(session) if session.user_id > 0 => Some(session),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("ignoring malformed session snapshot: {}", e);
                None
            }
        }
    }

    /// Install a fresh session and persist its snapshot. Only called on a
    /// successful login — a failed attempt must leave the previous session
    /// in place.
    pub fn store(&self, session: Session) {
        match serde_json::to_vec(&session) {
            Ok(bytes) => {
                if let Err(e) = self.kv.set(SESSION_KEY, &bytes) {
                    tracing::warn!("session snapshot write failed: {}", e);
                }
            }
            Err(e) => tracing::warn!("session snapshot encode failed: {}", e),
        }
        *self.write() = Some(session);
    }

    /// Drop the session, memory and snapshot both. Idempotent; snapshot
    /// delete failures are logged, never surfaced — the caller must end up
    /// logged out no matter what.
    pub fn clear(&self) {
        if let Err(e) = self.kv.delete(SESSION_KEY) {
            tracing::warn!("session snapshot delete failed: {}", e);
        }
        *self.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_kv::MemoryStore;

    fn session() -> Session {
        Session {
            user_id: 7,
            session_token: Some("sess-abc".into()),
            username: "ana".into(),
            database: "school".into(),
            display_name: Some("Ana".into()),
            partner_id: Some(7),
        }
    }

    #[test]
    fn store_then_check_auth() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        assert!(!store.check_auth());
        store.store(session());
        assert!(store.check_auth());
        assert_eq!(store.current().unwrap().username, "ana");
    }

    #[test]
    fn restores_from_snapshot_after_rebuild() {
        let kv: Arc<dyn KVStore> = Arc::new(MemoryStore::new());
        SessionStore::new(Arc::clone(&kv)).store(session());

        let rebuilt = SessionStore::new(kv);
        assert!(!rebuilt.is_authenticated());
        assert!(rebuilt.check_auth());
        assert_eq!(rebuilt.current().unwrap().user_id, 7);
    }

    #[test]
    fn malformed_snapshot_is_no_session() {
        let kv: Arc<dyn KVStore> = Arc::new(MemoryStore::new());
        kv.set(SESSION_KEY, b"{not json").unwrap();
        let store = SessionStore::new(Arc::clone(&kv));
        assert!(!store.check_auth());

        kv.set(SESSION_KEY, b"{\"user_id\":0,\"username\":\"\",\"database\":\"\"}")
            .unwrap();
        let store = SessionStore::new(kv);
        assert!(!store.check_auth());
    }

    #[test]
    fn clear_is_idempotent_and_wipes_snapshot() {
        let kv: Arc<dyn KVStore> = Arc::new(MemoryStore::new());
        let store = SessionStore::new(Arc::clone(&kv));
        store.store(session());
        store.clear();
        store.clear();
        assert!(!store.check_auth());
        assert_eq!(kv.get(SESSION_KEY).unwrap(), None);
    }
}
