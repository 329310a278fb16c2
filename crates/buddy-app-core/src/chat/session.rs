//! In-memory chat sessions.
//!
//! A session lives until it is removed, goes idle past the sweep threshold,
//! or the process exits; transcripts are never persisted. Each transcript
//! sits behind its own async mutex so turns within one session are
//! serialised while different sessions proceed concurrently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use uuid::Uuid;

use super::Transcript;

pub type SharedTranscript = Arc<Mutex<Transcript>>;

struct SessionEntry {
    transcript: SharedTranscript,
    last_active: std::sync::Mutex<Instant>,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            transcript: Arc::new(Mutex::new(Transcript::start())),
            last_active: std::sync::Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        if let Ok(mut at) = self.last_active.lock() {
            *at = Instant::now();
        }
    }

    /// Idle since before `cutoff` and no turn currently holds the transcript.
    fn is_idle(&self, cutoff: Instant) -> bool {
        let stale = self.last_active.lock().map(|at| *at < cutoff).unwrap_or(false);
        stale && self.transcript.try_lock().is_ok()
    }
}

/// Owns every live transcript, keyed by session id.
pub struct SessionManager {
    sessions: std::sync::RwLock<HashMap<Uuid, SessionEntry>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionManager({} sessions)", self.len())
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self { sessions: std::sync::RwLock::new(HashMap::new()) }
    }

    /// Start a new session seeded with the greeting and return its id.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        if let Ok(mut map) = self.sessions.write() {
            map.insert(id, SessionEntry::new());
        }
        id
    }

    /// Look up a session and mark it active.
    pub fn get(&self, id: &Uuid) -> Option<SharedTranscript> {
        let map = self.sessions.read().ok()?;
        let entry = map.get(id)?;
        entry.touch();
        Some(Arc::clone(&entry.transcript))
    }

    /// Drop a session.  Returns `true` if it existed.
    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions
            .write()
            .map(|mut map| map.remove(id).is_some())
            .unwrap_or(false)
    }

    /// Drop every session not looked up within `ttl`. A session whose turn
    /// is still running is kept. Returns the number removed.
    pub fn sweep_idle(&self, ttl: Duration) -> usize {
        let Some(cutoff) = Instant::now().checked_sub(ttl) else {
            return 0;
        };
        self.sessions
            .write()
            .map(|mut map| {
                let before = map.len();
                map.retain(|_, entry| !entry.is_idle(cutoff));
                before - map.len()
            })
            .unwrap_or(0)
    }

    /// Ids of all live sessions, in no particular order.
    pub fn list(&self) -> Vec<Uuid> {
        self.sessions
            .read()
            .map(|map| map.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
