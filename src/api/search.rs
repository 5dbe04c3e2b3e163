use log::{debug, info, warn};
use serde::Serialize;

use super::{
    err::TranslationFailure,
    filter::{filter_free_text, filter_structured, StructuredFilter},
    student::Student,
};

/// Shown when the translator could not understand the query.
pub const TRANSLATION_NOTICE: &str = "Maaf, AI tidak dapat memahami pencarian tersebut.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "filter", rename_all = "camelCase")]
pub enum SearchMode {
    Text,
    Structured(StructuredFilter),
}

/// Identifies one issued translation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTicket {
    generation: u64,
    query: String,
}

impl TranslationTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// the structured filter is now active
    Applied,
    /// the translator failed; mode and query are untouched
    Rejected { notice: &'static str },
    /// a newer request was issued in the meantime
    Stale,
}

/// Search box state: query text, active mode and the pending translation.
#[derive(Debug, Clone)]
pub struct SearchSession {
    query: String,
    mode: SearchMode,
    generation: u64,
    pending: Option<u64>,
    notice: Option<&'static str>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            mode: SearchMode::Text,
            generation: 0,
            pending: None,
            notice: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> &SearchMode {
        &self.mode
    }

    pub fn is_structured(&self) -> bool {
        matches!(self.mode, SearchMode::Structured(_))
    }

    pub fn is_translating(&self) -> bool {
        self.pending.is_some()
    }

    /// Updates the text box. In structured mode the text is only displayed.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Issues a translation request for the current query.
    ///
    /// Returns `None` for a blank query or while a structured filter is
    /// active; the caller then has nothing to send.
    pub fn begin_translation(&mut self) -> Option<TranslationTicket> {
        if self.query.trim().is_empty() || self.is_structured() {
            return None;
        }
        self.generation += 1;
        self.pending = Some(self.generation);
        self.notice = None;
        debug!(
            "translation #{} issued for {:?}",
            self.generation, self.query
        );
        Some(TranslationTicket {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    /// Applies a translator answer exactly once.
    pub fn finish_translation(
        &mut self,
        ticket: TranslationTicket,
        result: Result<StructuredFilter, TranslationFailure>,
    ) -> SearchOutcome {
        if self.pending != Some(ticket.generation) {
            debug!("translation #{} discarded as stale", ticket.generation);
            return SearchOutcome::Stale;
        }
        self.pending = None;

        match result {
            Ok(filter) => {
                info!("structured filter active: {:?}", filter.badges());
                self.mode = SearchMode::Structured(filter);
                SearchOutcome::Applied
            }
            Err(err) => {
                warn!("translation #{} failed: {}", ticket.generation, err);
                self.notice = Some(TRANSLATION_NOTICE);
                SearchOutcome::Rejected {
                    notice: TRANSLATION_NOTICE,
                }
            }
        }
    }

    /// Drops the structured filter and empties the text box.
    pub fn clear(&mut self) {
        self.mode = SearchMode::Text;
        self.query.clear();
        self.notice = None;
    }

    /// The pending notice, if any; reading it dismisses it.
    pub fn take_notice(&mut self) -> Option<&'static str> {
        self.notice.take()
    }

    pub fn visible<'a>(&self, records: &'a [Student]) -> Vec<&'a Student> {
        match &self.mode {
            SearchMode::Text => filter_free_text(records, &self.query),
            SearchMode::Structured(filter) => filter_structured(records, filter),
        }
    }
}
