//! Session registry — id derivation, the active-session pointer, and all
//! indicator-list mutations.
//!
//! Ids are derived from sanitized, lowercased symbol/exchange so that two
//! spellings of the same pair collide (and get a numeric suffix) while the
//! display fields keep the caller's case. Every mutation writes through to
//! the stored session; there is no separate working copy.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::indicator::{IndicatorKind, IndicatorSpec};
use super::preset::Preset;

/// Unique session identifier, stable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised by session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown session: {0}")]
    NotFound(String),

    #[error("no active session")]
    NoActiveSession,

    #[error("symbol is empty after sanitization")]
    EmptySymbol,

    #[error("exchange is empty after sanitization")]
    EmptyExchange,
}

/// One viewing context: symbol, exchange, and an ordered indicator list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Display form, caller's case preserved.
    pub symbol: String,
    pub exchange: String,
    pub indicators: Vec<IndicatorSpec>,
    /// Monotonic counter backing generated indicator ids.
    next_indicator_seq: u64,
}

impl Session {
    fn new(id: SessionId, symbol: &str, exchange: &str) -> Self {
        Self {
            id,
            symbol: symbol.to_string(),
            exchange: exchange.to_string(),
            indicators: Vec::new(),
            next_indicator_seq: 0,
        }
    }

    fn next_indicator_id(&mut self, kind: IndicatorKind) -> String {
        self.next_indicator_seq += 1;
        format!("{}_{}", kind.tag(), self.next_indicator_seq)
    }
}

/// In-memory session registry plus the active-session pointer.
///
/// Sessions are never deleted; the active pointer is `None` only before the
/// first `create_session` call.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, Session>,
    active: Option<SessionId>,
}

/// Replace everything outside `[A-Za-z0-9_-]` with an underscore.
fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A component is usable only if it carries at least one alphanumeric char;
/// all-punctuation input sanitizes to underscores and is rejected.
fn has_substance(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_alphanumeric())
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for (symbol, exchange) and make it active.
    ///
    /// The id base is the sanitized, lowercased pair; an already-taken base
    /// gets the smallest unused positive `_N` suffix.
    pub fn create_session(
        &mut self,
        symbol: &str,
        exchange: &str,
    ) -> Result<SessionId, SessionError> {
        if !has_substance(symbol) {
            return Err(SessionError::EmptySymbol);
        }
        if !has_substance(exchange) {
            return Err(SessionError::EmptyExchange);
        }

        let base = format!(
            "{}_{}",
            sanitize(symbol).to_lowercase(),
            sanitize(exchange).to_lowercase()
        );

        let mut candidate = base.clone();
        let mut suffix = 1u32;
        while self.sessions.contains_key(&SessionId(candidate.clone())) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }

        let id = SessionId(candidate);
        self.sessions
            .insert(id.clone(), Session::new(id.clone(), symbol, exchange));
        self.active = Some(id.clone());
        Ok(id)
    }

    /// Make `id` the active session. The previously active session keeps its
    /// indicator list untouched.
    pub fn switch_session(&mut self, id: &SessionId) -> Result<(), SessionError> {
        if !self.sessions.contains_key(id) {
            return Err(SessionError::NotFound(id.to_string()));
        }
        self.active = Some(id.clone());
        Ok(())
    }

    pub fn active(&self) -> Option<&Session> {
        self.active.as_ref().and_then(|id| self.sessions.get(id))
    }

    pub fn active_id(&self) -> Option<&SessionId> {
        self.active.as_ref()
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn active_mut(&mut self) -> Result<&mut Session, SessionError> {
        let id = self.active.clone().ok_or(SessionError::NoActiveSession)?;
        self.sessions
            .get_mut(&id)
            .ok_or(SessionError::NoActiveSession)
    }

    /// Append an indicator to the active session's list.
    ///
    /// Returns the generated indicator id (unique within the session).
    /// Absent or non-positive periods are coerced to the default.
    pub fn add_indicator(
        &mut self,
        kind: IndicatorKind,
        requested_period: Option<i64>,
    ) -> Result<String, SessionError> {
        let session = self.active_mut()?;
        let id = session.next_indicator_id(kind);
        session
            .indicators
            .push(IndicatorSpec::new(id.clone(), kind, requested_period));
        Ok(id)
    }

    /// Remove an indicator from the active session's list by id.
    ///
    /// Unknown ids are a no-op; the return value says whether anything was
    /// removed.
    pub fn remove_indicator(&mut self, indicator_id: &str) -> Result<bool, SessionError> {
        let session = self.active_mut()?;
        let before = session.indicators.len();
        session.indicators.retain(|ind| ind.id != indicator_id);
        Ok(session.indicators.len() != before)
    }

    /// Replace the active session's indicator list with a named preset.
    ///
    /// Unknown preset names are a no-op; the return value says whether the
    /// list was replaced.
    pub fn apply_preset(&mut self, name: &str) -> Result<bool, SessionError> {
        let Some(preset) = Preset::from_name(name) else {
            return Ok(false);
        };
        let session = self.active_mut()?;
        session.indicators.clear();
        for &(kind, period) in preset.entries() {
            let id = session.next_indicator_id(kind);
            session
                .indicators
                .push(IndicatorSpec::new(id, kind, Some(period)));
        }
        Ok(true)
    }
}
