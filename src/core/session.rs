//! Session registry with authentication state and idle expiry.
//!
//! Sessions are keyed by a caller-supplied opaque id. The id is a
//! correlation token only: knowing an id never grants access, the
//! authorization gate is the `authenticated` flag which is set only
//! after a credential passes validation.
//!
//! The store owns every record. Callers get cloned snapshots, so a
//! session deleted mid-call stays usable by that call's snapshot and
//! only the next lookup misses. That race is accepted.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Server-side record tracking authentication state for one session id
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub authenticated: bool,
    /// Validated credential. Always present when `authenticated` is true.
    pub credential: Option<String>,
    /// Claims asserted by the validated credential
    pub claims: Option<HashMap<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    fn new(id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            authenticated: false,
            credential: None,
            claims: None,
            created_at: now,
            last_activity: now,
        }
    }
}

/// Concurrent map from session id to session record
///
/// Shared by request handlers and the background sweeper. An injected
/// instance (behind `Arc`), never a process-wide singleton, so tests
/// can build isolated stores.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a fresh, unauthenticated record.
    ///
    /// An existing record under the same id is overwritten. Idempotent
    /// re-creation is deliberate: re-creating a session resets its
    /// authentication state rather than erroring.
    pub fn create(&self, id: &str) -> Session {
        let session = Session::new(id);
        let mut sessions = self.write_lock();
        sessions.insert(id.to_string(), session.clone());
        debug!(session_id = %id, "Session created");
        session
    }

    /// Look up a session, refreshing its activity timestamp.
    ///
    /// This is a read with a side effect: every successful `get` pushes
    /// `last_activity` forward, which postpones expiry.
    pub fn get(&self, id: &str) -> Option<Session> {
        let mut sessions = self.write_lock();
        let session = sessions.get_mut(id)?;
        session.last_activity = Utc::now();
        Some(session.clone())
    }

    /// Look up a session without touching its activity timestamp.
    ///
    /// Used by read-only status endpoints so that monitoring does not
    /// keep idle sessions alive.
    pub fn peek(&self, id: &str) -> Option<Session> {
        self.read_lock().get(id).cloned()
    }

    /// Look up a session, creating it when absent.
    ///
    /// Lazy creation on first reference is kept as an explicit API so
    /// the side effect is visible at call sites.
    pub fn get_or_create(&self, id: &str) -> Session {
        let mut sessions = self.write_lock();
        let session = sessions.entry(id.to_string()).or_insert_with(|| {
            debug!(session_id = %id, "Session created on first reference");
            Session::new(id)
        });
        session.last_activity = Utc::now();
        session.clone()
    }

    /// Transition a session to the authenticated state.
    ///
    /// Stores credential and claims in the same critical section as the
    /// flag flip, so no observer can see `authenticated` without a
    /// credential. Creates the session when absent.
    pub fn authenticate(
        &self,
        id: &str,
        credential: String,
        claims: Option<HashMap<String, Value>>,
    ) -> Session {
        let mut sessions = self.write_lock();
        let session = sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::new(id));
        session.authenticated = true;
        session.credential = Some(credential);
        session.claims = claims;
        session.last_activity = Utc::now();
        info!(session_id = %id, "Session authenticated");
        session.clone()
    }

    /// Remove a session. No-op if absent.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.write_lock().remove(id).is_some();
        if removed {
            info!(session_id = %id, "Session deleted");
        }
        removed
    }

    /// Remove every session idle longer than `timeout`.
    ///
    /// A zero or negative timeout disables expiry and sweeps nothing.
    /// Returns the number of sessions removed.
    pub fn sweep(&self, now: DateTime<Utc>, timeout: Duration) -> usize {
        if timeout <= Duration::zero() {
            return 0;
        }

        let mut sessions = self.write_lock();
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_activity <= timeout);
        let removed = before - sessions.len();

        if removed > 0 {
            info!(removed, remaining = sessions.len(), "Swept idle sessions");
        }
        removed
    }

    /// Number of live sessions
    pub fn count(&self) -> usize {
        self.read_lock().len()
    }

    // Lock poisoning only happens if a holder panicked; the map itself
    // stays coherent, so recover the guard and continue.
    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to the background sweep task
///
/// Aborting the handle stops the sweeper; dropping it without abort
/// leaves the task running for the process lifetime.
pub struct SweeperHandle {
    task: tokio::task::JoinHandle<()>,
}

impl SweeperHandle {
    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn the periodic sweep task.
///
/// Returns `None` when `timeout_sec` is zero (expiry disabled). The
/// task never dies on error: each tick logs and continues.
pub fn spawn_sweeper(
    store: Arc<SessionStore>,
    sweep_interval_sec: u64,
    timeout_sec: u64,
) -> Option<SweeperHandle> {
    if timeout_sec == 0 {
        info!("Session expiry disabled, sweeper not started");
        return None;
    }

    let timeout = Duration::seconds(timeout_sec as i64);
    let task = tokio::spawn(async move {
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(sweep_interval_sec));
        // First tick fires immediately, skip it
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                store.sweep(Utc::now(), timeout)
            }));
            if let Err(e) = result {
                warn!("Sweep iteration panicked: {:?}", e);
            }
        }
    });

    info!(
        interval_sec = sweep_interval_sec,
        timeout_sec, "Session sweeper started"
    );
    Some(SweeperHandle { task })
}
