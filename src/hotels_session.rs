//!  EAN Hotel Agent
//!
//!  Copyright (C) 2026  The ean-hotel-agent authors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Search Session
//!
//! Session continuity and pagination state for one logical user interaction
//! with the EAN API. The state is an explicit context object passed into
//! each adapter call rather than process-wide client state, so interleaved
//! searches from different users cannot corrupt each other's cursor.

/// Opaque continuation tokens issued by the remote service to resume a
/// previously started multi-page search. The cache key and cache location
/// are only ever valid together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageCursor {
    pub cache_key: String,
    pub cache_location: String,
}

/// Mutable per-interaction state: the sticky `customerSessionId` echoed on
/// subsequent calls, and the pagination cursor of the search in progress.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    customer_session_id: Option<String>,
    cursor: Option<PageCursor>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the remote service holds more pages for the search in
    /// progress. Callers use this to decide whether to offer a "next page"
    /// action.
    pub fn paging(&self) -> bool {
        self.cursor.is_some()
    }

    /// Drops the pagination cursor before starting a new, unrelated search.
    ///
    /// The session identifier is deliberately kept: it spans the whole user
    /// interaction sequence, not a single search.
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    pub fn customer_session_id(&self) -> Option<&str> {
        self.customer_session_id.as_deref()
    }

    pub(crate) fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    /// Overwrites the stored session token. Any response envelope may carry
    /// a `customerSessionId`; the most recent one wins.
    pub(crate) fn adopt_session_id(&mut self, id: &str) {
        self.customer_session_id = Some(id.to_string());
    }

    /// Adopts the continuation tokens of a list response. The cursor is held
    /// only when the more-results flag is set and both tokens are present;
    /// in every other case the session returns to the fresh state.
    pub(crate) fn adopt_cursor(
        &mut self,
        more_results_available: bool,
        cache_key: Option<&str>,
        cache_location: Option<&str>,
    ) {
        self.cursor = match (more_results_available, cache_key, cache_location) {
            (true, Some(key), Some(location)) => Some(PageCursor {
                cache_key: key.to_string(),
                cache_location: location.to_string(),
            }),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_not_paging() {
        let session = SearchSession::new();
        assert!(!session.paging());
        assert!(session.cursor().is_none());
        assert!(session.customer_session_id().is_none());
    }

    #[test]
    fn adopting_cursor_requires_flag_and_both_tokens() {
        let mut session = SearchSession::new();

        session.adopt_cursor(true, Some("abc"), Some("loc1"));
        assert!(session.paging());
        let cursor = session.cursor().unwrap();
        assert_eq!(cursor.cache_key, "abc");
        assert_eq!(cursor.cache_location, "loc1");

        // Flag cleared: back to fresh even though tokens were sent.
        session.adopt_cursor(false, Some("abc"), Some("loc1"));
        assert!(!session.paging());

        // A token without its counterpart never produces a cursor.
        session.adopt_cursor(true, Some("abc"), None);
        assert!(!session.paging());
        session.adopt_cursor(true, None, Some("loc1"));
        assert!(!session.paging());
    }

    #[test]
    fn reset_clears_cursor_from_any_state() {
        let mut session = SearchSession::new();
        session.adopt_cursor(true, Some("abc"), Some("loc1"));
        session.reset();
        assert!(!session.paging());
        assert!(session.cursor().is_none());

        // Resetting a fresh session is a no-op.
        session.reset();
        assert!(!session.paging());
    }

    #[test]
    fn reset_keeps_session_identifier() {
        let mut session = SearchSession::new();
        session.adopt_session_id("sess-1");
        session.adopt_cursor(true, Some("abc"), Some("loc1"));
        session.reset();
        assert_eq!(session.customer_session_id(), Some("sess-1"));
    }

    #[test]
    fn latest_session_identifier_wins() {
        let mut session = SearchSession::new();
        session.adopt_session_id("sess-1");
        session.adopt_session_id("sess-2");
        assert_eq!(session.customer_session_id(), Some("sess-2"));
    }
}
