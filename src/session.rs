//! Per-session form state.
//!
//! One `FormSession` per interactive client: the active form, its
//! in-progress raw values, and the last successful result (which gates
//! export). Sessions never share mutable state.
//!
//! Key properties:
//! - State exists only in memory, never persisted
//! - Switching forms discards raw values and the last result
//! - Editing any field discards the last result
//! - Capacity-bounded: the least recently used session is evicted when full

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::forms::{FormDefinition, FormId};
use crate::pipeline::{DispatchOutcome, PredictionResult, RawInput};

/// Default maximum number of live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 512;

// ═══════════════════════════════════════════════════════════
// FormSession — one client's in-progress form
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct FormSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    active_form: FormId,
    raw: RawInput,
    last_result: Option<PredictionResult>,
}

impl FormSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_seen: now,
            active_form: FormId::default(),
            raw: RawInput::new(),
            last_result: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last time the session was created or modified.
    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    fn touch(&mut self) {
        self.last_seen = Utc::now();
    }

    pub fn active_form(&self) -> FormId {
        self.active_form
    }

    pub fn raw(&self) -> &RawInput {
        &self.raw
    }

    pub fn last_result(&self) -> Option<&PredictionResult> {
        self.last_result.as_ref()
    }

    /// Activate another form. Values entered for the previous form do not
    /// carry over, even when field names coincide.
    pub fn select_form(&mut self, form: FormId) {
        self.active_form = form;
        self.raw.clear();
        self.last_result = None;
    }

    /// Merge raw values for the active form. Names the form does not declare
    /// are dropped; returns how many were kept.
    pub fn set_fields(&mut self, form: &FormDefinition, values: RawInput) -> usize {
        let mut kept = 0;
        for (name, value) in values {
            if form.field(&name).is_some() {
                self.raw.insert(name, value);
                kept += 1;
            }
        }
        self.last_result = None;
        kept
    }

    /// Remember a successful result for export; anything else clears it.
    pub fn record_outcome(&mut self, outcome: &DispatchOutcome) {
        self.last_result = outcome.result().cloned();
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// SessionStore
// ═══════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<Uuid, FormSession>,
    capacity: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Start a session with the default form active.
    pub fn create(&mut self) -> &FormSession {
        if self.sessions.len() >= self.capacity {
            self.evict_least_recent();
        }
        let session = FormSession::new();
        let id = session.id();
        self.sessions.entry(id).or_insert(session)
    }

    pub fn get(&self, id: &Uuid) -> Option<&FormSession> {
        self.sessions.get(id)
    }

    /// Mutable access counts as activity and refreshes `last_seen`.
    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut FormSession> {
        let session = self.sessions.get_mut(id)?;
        session.touch();
        Some(session)
    }

    pub fn remove(&mut self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn evict_least_recent(&mut self) {
        let idle = self
            .sessions
            .values()
            .min_by_key(|s| s.last_seen())
            .map(FormSession::id);
        if let Some(id) = idle {
            self.sessions.remove(&id);
            tracing::debug!(%id, "Session evicted (capacity reached)");
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
