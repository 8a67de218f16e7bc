//! Table view state machine
//!
//! Idle -> Loading -> {Rendered | Errored}, re-entered on every refresh.
//! Every request carries a sequence number and only the newest one may
//! change the view.

use super::render::ResultsView;
use crate::error::FetchError;
use crate::models::{ProfileKind, TableResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum TableState {
    Idle,
    Loading { seq: u64, profile: ProfileKind },
    Rendered(ResultsView),
    Errored(String),
}

#[derive(Debug, Clone)]
pub struct TableView {
    state: TableState,
    latest_seq: u64,
    discarded: u64,
}

impl Default for TableView {
    fn default() -> Self {
        Self::new()
    }
}

impl TableView {
    pub fn new() -> Self {
        Self {
            state: TableState::Idle,
            latest_seq: 0,
            discarded: 0,
        }
    }

    /// Enter Loading for request `seq`; later calls supersede earlier ones.
    pub fn begin(&mut self, seq: u64, profile: ProfileKind) {
        self.latest_seq = seq;
        self.state = TableState::Loading { seq, profile };
    }

    /// Apply a response. Returns false and leaves the view untouched when
    /// `seq` is not the latest issued request.
    pub fn apply(&mut self, seq: u64, result: Result<TableResponse, FetchError>) -> bool {
        if seq != self.latest_seq {
            self.discarded += 1;
            log::debug!("[TABLE] Discarding stale response #{} (latest is #{})", seq, self.latest_seq);
            return false;
        }

        self.state = match result {
            Ok(response) => {
                let view = ResultsView::from_response(&response);
                log::debug!("[TABLE] Rendered #{} ({} rows)", seq, view.row_count());
                TableState::Rendered(view)
            }
            Err(e) => {
                log::warn!("[TABLE] Request #{} failed: {}", seq, e);
                TableState::Errored(e.display_body())
            }
        };
        true
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, TableState::Loading { .. })
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// The current view as an exportable results view
    pub fn results(&self) -> Option<ResultsView> {
        match &self.state {
            TableState::Rendered(view) => Some(view.clone()),
            TableState::Errored(text) => Some(ResultsView::Text(text.clone())),
            _ => None,
        }
    }
}

/// Text shown while a request is outstanding
pub fn loading_message(profile: ProfileKind) -> &'static str {
    match profile {
        ProfileKind::Cpu => "Loading, be patient... CPU profile takes 30 seconds.",
        ProfileKind::Heap => "Loading...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportRow;

    fn rows(names: &[&str]) -> TableResponse {
        TableResponse::Rows(
            names
                .iter()
                .map(|n| ReportRow { name: n.to_string(), ..Default::default() })
                .collect(),
        )
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut view = TableView::new();
        view.begin(1, ProfileKind::Heap);
        view.begin(2, ProfileKind::Cpu);

        assert!(view.apply(2, Ok(rows(&["new"]))));
        assert!(!view.apply(1, Ok(rows(&["old"]))));

        match view.state() {
            TableState::Rendered(ResultsView::Table(r)) => assert_eq!(r[0].name(), "new"),
            other => panic!("Unexpected state: {:?}", other),
        }
        assert_eq!(view.discarded(), 1);
    }

    #[test]
    fn test_stale_response_does_not_end_loading() {
        let mut view = TableView::new();
        view.begin(1, ProfileKind::Heap);
        view.begin(2, ProfileKind::Heap);
        assert!(!view.apply(1, Ok(rows(&["old"]))));
        assert!(view.is_loading());
    }

    #[test]
    fn test_error_replaces_loading() {
        let mut view = TableView::new();
        view.begin(1, ProfileKind::Cpu);
        let err = FetchError::Status { code: 500, body: "profile collection timed out".to_string() };
        assert!(view.apply(1, Err(err)));
        assert_eq!(view.state(), &TableState::Errored("profile collection timed out".to_string()));
        assert!(!view.is_loading());
    }
}
