//! Application state of one dashboard session.
//!
//! Every change goes through a named command on [`Dashboard`]. The AI
//! operations are split in a `begin_*` step, which hands out a ticket, and
//! a `finish_*` step, which applies the answer; the caller awaits the
//! collaborator in between without holding the dashboard.

use log::debug;
use serde::Serialize;

use super::{
    auth::LoginGate,
    err::{CustomError, TranslationFailure},
    filter::StructuredFilter,
    gemini::{summary_or_fallback, Collaborator, SUMMARY_LOADING},
    search::{SearchMode, SearchOutcome, SearchSession, TranslationTicket},
    stats::DashboardStats,
    store::RecordStore,
    student::{Major, Status, Student, StudentDraft},
};

/// A summary request in flight.
#[derive(Debug, Clone)]
pub struct SummaryTicket {
    generation: u64,
    revision: u64,
    composition: Vec<(Major, Status)>,
}

impl SummaryTicket {
    pub fn composition(&self) -> &[(Major, Status)] {
        &self.composition
    }
}

#[derive(Debug, Clone)]
struct SummaryState {
    text: String,
    generation: u64,
    pending: Option<u64>,
    /// store revision the text was computed from
    describes: Option<u64>,
}

/// What the student table shows.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub query: String,
    pub mode: SearchMode,
    pub badges: Vec<(&'static str, String)>,
    pub translating: bool,
    pub notice: Option<&'static str>,
    pub students: Vec<Student>,
}

pub struct Dashboard {
    gate: LoginGate,
    logged_in: bool,
    store: RecordStore,
    search: SearchSession,
    summary: SummaryState,
}

impl Dashboard {
    pub fn new(gate: LoginGate, store: RecordStore) -> Self {
        Self {
            gate,
            logged_in: false,
            store,
            search: SearchSession::new(),
            summary: SummaryState {
                text: SUMMARY_LOADING.to_string(),
                generation: 0,
                pending: None,
                describes: None,
            },
        }
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<(), CustomError> {
        self.gate.check(username, password)?;
        self.logged_in = true;
        Ok(())
    }

    pub fn logout(&mut self) {
        self.logged_in = false;
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn ensure_logged_in(&self) -> Result<(), CustomError> {
        if self.logged_in {
            Ok(())
        } else {
            Err(CustomError::NotLoggedIn)
        }
    }

    pub fn students(&self) -> Result<&[Student], CustomError> {
        self.ensure_logged_in()?;
        Ok(self.store.students())
    }

    pub fn student(&self, id: &str) -> Result<&Student, CustomError> {
        self.ensure_logged_in()?;
        self.store
            .get(id)
            .ok_or_else(|| CustomError::StudentNotFound(id.to_string()))
    }

    /// The list changed; the current summary no longer describes it.
    fn invalidate_summary(&mut self) {
        self.summary.generation += 1;
        self.summary.pending = None;
        self.summary.describes = None;
        self.summary.text = SUMMARY_LOADING.to_string();
    }

    pub fn create_student(&mut self, draft: StudentDraft) -> Result<Student, CustomError> {
        self.ensure_logged_in()?;
        let created = self.store.create(draft)?.clone();
        self.invalidate_summary();
        Ok(created)
    }

    pub fn update_student(&mut self, id: &str, draft: StudentDraft) -> Result<Student, CustomError> {
        self.ensure_logged_in()?;
        let updated = self.store.update(id, draft)?.clone();
        self.invalidate_summary();
        Ok(updated)
    }

    pub fn delete_student(&mut self, id: &str) -> Result<Student, CustomError> {
        self.ensure_logged_in()?;
        let removed = self.store.delete(id)?;
        self.invalidate_summary();
        Ok(removed)
    }

    /// Adds a batch of drafts, all or nothing. The first draft ends up on top.
    pub fn import_students(&mut self, drafts: Vec<StudentDraft>) -> Result<usize, CustomError> {
        self.ensure_logged_in()?;
        for draft in &drafts {
            draft.validate()?;
        }
        let count = drafts.len();
        for draft in drafts.into_iter().rev() {
            self.store.create(draft)?;
        }
        if count > 0 {
            self.invalidate_summary();
        }
        Ok(count)
    }

    pub fn set_query(&mut self, query: &str) -> Result<(), CustomError> {
        self.ensure_logged_in()?;
        self.search.set_query(query);
        Ok(())
    }

    /// `None` when there is nothing to translate (blank query, or a
    /// structured filter is already active).
    pub fn begin_ai_search(&mut self) -> Result<Option<TranslationTicket>, CustomError> {
        self.ensure_logged_in()?;
        Ok(self.search.begin_translation())
    }

    pub fn finish_ai_search(
        &mut self,
        ticket: TranslationTicket,
        result: Result<StructuredFilter, TranslationFailure>,
    ) -> SearchOutcome {
        self.search.finish_translation(ticket, result)
    }

    pub fn clear_filter(&mut self) -> Result<(), CustomError> {
        self.ensure_logged_in()?;
        self.search.clear();
        Ok(())
    }

    pub fn search(&self) -> &SearchSession {
        &self.search
    }

    pub fn visible_students(&self) -> Result<Vec<&Student>, CustomError> {
        self.ensure_logged_in()?;
        Ok(self.search.visible(self.store.students()))
    }

    /// Snapshot of the table; a pending notice is handed out once.
    pub fn table_view(&mut self) -> Result<TableView, CustomError> {
        self.ensure_logged_in()?;
        let notice = self.search.take_notice();
        let badges = match self.search.mode() {
            SearchMode::Structured(filter) => filter.badges(),
            SearchMode::Text => Vec::new(),
        };
        Ok(TableView {
            query: self.search.query().to_string(),
            mode: self.search.mode().clone(),
            badges,
            translating: self.search.is_translating(),
            notice,
            students: self.visible_students()?.into_iter().cloned().collect(),
        })
    }

    pub fn stats(&self) -> Result<DashboardStats, CustomError> {
        self.ensure_logged_in()?;
        Ok(DashboardStats::compute(self.store.students()))
    }

    pub fn summary(&self) -> &str {
        &self.summary.text
    }

    /// True once the summary describes the current list.
    pub fn summary_is_fresh(&self) -> bool {
        self.summary.describes == Some(self.store.revision())
    }

    pub fn begin_summary(&mut self) -> Result<SummaryTicket, CustomError> {
        self.ensure_logged_in()?;
        self.summary.generation += 1;
        self.summary.pending = Some(self.summary.generation);
        Ok(SummaryTicket {
            generation: self.summary.generation,
            revision: self.store.revision(),
            composition: self.store.composition(),
        })
    }

    /// Stores the summary text unless a newer request superseded it.
    pub fn finish_summary(&mut self, ticket: SummaryTicket, text: String) -> bool {
        if self.summary.pending != Some(ticket.generation)
            || ticket.revision != self.store.revision()
        {
            debug!("summary #{} discarded as stale", ticket.generation);
            return false;
        }
        self.summary.pending = None;
        self.summary.describes = Some(ticket.revision);
        self.summary.text = text;
        true
    }

    /// begin → translate → finish, holding the dashboard throughout.
    pub async fn ai_search(
        &mut self,
        collaborator: &dyn Collaborator,
    ) -> Result<Option<SearchOutcome>, CustomError> {
        let Some(ticket) = self.begin_ai_search()? else {
            return Ok(None);
        };
        let result = collaborator.translate_query(ticket.query()).await;
        Ok(Some(self.finish_ai_search(ticket, result)))
    }

    pub async fn refresh_summary(&mut self, collaborator: &dyn Collaborator) -> Result<&str, CustomError> {
        let ticket = self.begin_summary()?;
        let text = summary_or_fallback(collaborator, ticket.composition()).await;
        self.finish_summary(ticket, text);
        Ok(self.summary())
    }
}
