//! Incremental company search
//!
//! [`SearchIndex`] ranks catalog entries against a query: prefix matches
//! first, then substring-only matches, each group in catalog order.
//! [`SearchSession`] layers the interactive behavior on top: debounced
//! re-evaluation as the query changes, a cached last result, highlighting,
//! and confirmation.

use crate::config::SearchConfig;
use crate::core::catalog::CompanyCatalog;
use crate::error::{ArError, ArResult};
use std::time::Instant;
use tracing::debug;

/// Outcome of an interactive selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(String),
    /// Operator abort, not an error
    Cancelled,
}

/// Case-folded view of a catalog, ready for ranked matching
#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<String>,
    folded: Vec<String>,
    config: SearchConfig,
}

impl SearchIndex {
    pub fn new(catalog: &CompanyCatalog, config: SearchConfig) -> Self {
        Self::from_entries(catalog.companies().to_vec(), config)
    }

    pub fn from_entries(entries: Vec<String>, config: SearchConfig) -> Self {
        let folded = entries.iter().map(|e| e.to_lowercase()).collect();
        Self {
            entries,
            folded,
            config,
        }
    }

    /// Trimmed, case-folded form used for matching
    pub fn normalize(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// Large catalogs never list unfiltered
    pub fn is_lazy(&self) -> bool {
        self.entries.len() > self.config.lazy_threshold
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(String::as_str)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Exact, case-sensitive lookup of an untouched query string
    pub fn exact(&self, raw: &str) -> Option<usize> {
        self.entries.iter().position(|e| e == raw)
    }

    /// Ranked entry indices for an already-normalized query
    pub fn search(&self, normalized: &str) -> Vec<usize> {
        if normalized.is_empty() {
            return if self.is_lazy() {
                Vec::new()
            } else {
                (0..self.entries.len()).collect()
            };
        }

        if self.is_lazy() && normalized.chars().count() < self.config.lazy_min_query_len {
            return Vec::new();
        }

        let mut results: Vec<usize> = self
            .folded
            .iter()
            .enumerate()
            .filter(|(_, folded)| folded.starts_with(normalized))
            .map(|(idx, _)| idx)
            .collect();

        if results.len() >= self.config.prefix_cap {
            debug!(
                prefix_matches = results.len(),
                "prefix cap reached; skipping substring pass"
            );
            return results;
        }

        results.extend(
            self.folded
                .iter()
                .enumerate()
                .filter(|(_, folded)| {
                    !folded.starts_with(normalized) && folded.contains(normalized)
                })
                .map(|(idx, _)| idx),
        );

        results
    }

    /// Ranked entries for a raw query
    pub fn matches(&self, query: &str) -> Vec<&str> {
        self.search(&Self::normalize(query))
            .into_iter()
            .map(|idx| self.entries[idx].as_str())
            .collect()
    }
}

/// A scheduled evaluation; a newer one always replaces it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingEvaluation {
    ticket: u64,
    due: Instant,
}

/// Session-scoped mutable search state
#[derive(Debug, Default)]
struct SessionState {
    query: String,
    pending: Option<PendingEvaluation>,
    next_ticket: u64,
    last_normalized: Option<String>,
    results: Vec<usize>,
    highlighted: Option<usize>,
    evaluations: usize,
}

/// One interactive narrowing of a catalog down to a single company
///
/// Time is passed in explicitly so the debounce is driven by whatever
/// event loop owns the session.
#[derive(Debug)]
pub struct SearchSession {
    index: SearchIndex,
    state: SessionState,
}

impl SearchSession {
    /// Start with the empty query already evaluated
    pub fn new(index: SearchIndex) -> Self {
        let mut session = Self {
            index,
            state: SessionState::default(),
        };
        session.evaluate();
        session
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    /// Record a new query and schedule its evaluation after the debounce
    /// delay, cancelling any evaluation still pending
    pub fn type_query(&mut self, text: &str, now: Instant) -> u64 {
        let ticket = self.state.next_ticket;
        self.state.next_ticket += 1;

        if let Some(previous) = self.state.pending.replace(PendingEvaluation {
            ticket,
            due: now + self.index.config.debounce,
        }) {
            debug!(cancelled = previous.ticket, scheduled = ticket, "search re-scheduled");
        }

        self.state.query = text.to_string();
        self.state.highlighted = None;
        ticket
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending.is_some()
    }

    /// Run the pending evaluation if its delay has elapsed
    ///
    /// Returns true when an evaluation actually ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state.pending {
            Some(pending) if pending.due <= now => {
                self.state.pending = None;
                self.evaluate()
            }
            _ => false,
        }
    }

    /// Run the pending evaluation immediately
    pub fn settle(&mut self) -> bool {
        if self.state.pending.take().is_some() {
            self.evaluate()
        } else {
            false
        }
    }

    fn evaluate(&mut self) -> bool {
        let normalized = SearchIndex::normalize(&self.state.query);
        if self.state.last_normalized.as_deref() == Some(normalized.as_str()) {
            return false;
        }

        self.state.results = self.index.search(&normalized);
        self.state.last_normalized = Some(normalized);
        self.state.evaluations += 1;
        true
    }

    /// Number of evaluations that ran (cache hits excluded)
    pub fn evaluations(&self) -> usize {
        self.state.evaluations
    }

    /// The list as of the last settled query
    pub fn results(&self) -> Vec<&str> {
        self.state
            .results
            .iter()
            .filter_map(|idx| self.index.entry(*idx))
            .collect()
    }

    pub fn result_count(&self) -> usize {
        self.state.results.len()
    }

    /// Highlight the result at `position` (zero-based)
    pub fn highlight(&mut self, position: usize) -> ArResult<()> {
        if position >= self.state.results.len() {
            return Err(ArError::Selection(format!(
                "no result #{} (showing {})",
                position + 1,
                self.state.results.len()
            )));
        }
        self.state.highlighted = Some(position);
        Ok(())
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.state
            .highlighted
            .and_then(|pos| self.state.results.get(pos))
            .and_then(|idx| self.index.entry(*idx))
    }

    /// Confirm the highlighted entry, or else an exact (case-sensitive,
    /// untrimmed) match of the typed query
    pub fn confirm(&self) -> ArResult<Selection> {
        if let Some(entry) = self.highlighted() {
            return Ok(Selection::Chosen(entry.to_string()));
        }

        match self.index.exact(&self.state.query) {
            Some(idx) => Ok(Selection::Chosen(self.index.entries[idx].clone())),
            None => Err(ArError::Selection(format!(
                "'{}' is not a company; pick one from the list",
                self.state.query
            ))),
        }
    }

    pub fn cancel(&mut self) -> Selection {
        self.state.pending = None;
        self.state.highlighted = None;
        Selection::Cancelled
    }
}
