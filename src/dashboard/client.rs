//! DashboardClient: session state plus the two background lifecycles
//!
//! Table refreshes and stats polls run as tokio tasks and report back through
//! one event channel. Only `process_events` / `apply_event` mutate the
//! session, so the UI thread owns all state and no locks are needed.

use super::buffers::StatsHistory;
use super::charts::ChartModel;
use super::commands::{parse_command, PromptCommand};
use super::poller::{PollerHandle, StatsPoller};
use super::table::TableView;
use crate::backend::ProfileBackend;
use crate::config::DashboardConfig;
use crate::error::{AppError, CommandError, FetchError};
use crate::models::{ProfileKind, StatsSample, TableQuery, TableResponse};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Outcomes delivered from background tasks to the UI thread
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    TableLoaded {
        seq: u64,
        result: Result<TableResponse, FetchError>,
    },
    StatsSampled(Result<StatsSample, FetchError>),
}

/// Everything the dashboard knows during one session.
///
/// Created when the dashboard opens and dropped when it closes.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    pub profile: ProfileKind,
    pub filter: String,
    pub cumsort: bool,
    pub table: TableView,
    pub stats: StatsHistory,
    /// Latest stats or prompt error; cleared by the next good sample
    pub status: Option<String>,
}

impl DashboardSession {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            profile: config.default_profile,
            filter: String::new(),
            cumsort: config.cumsort,
            table: TableView::new(),
            stats: StatsHistory::new(config.history_len),
            status: None,
        }
    }
}

pub struct DashboardClient {
    backend: Arc<dyn ProfileBackend>,
    session: DashboardSession,
    events_tx: mpsc::Sender<DashboardEvent>,
    events_rx: mpsc::Receiver<DashboardEvent>,
    next_seq: u64,
    in_flight: Option<JoinHandle<()>>,
    poller: Option<PollerHandle>,
    poll_interval: Duration,
    charts_dirty: bool,
}

impl DashboardClient {
    pub fn new(backend: Arc<dyn ProfileBackend>, config: &DashboardConfig) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            backend,
            session: DashboardSession::new(config),
            events_tx,
            events_rx,
            next_seq: 0,
            in_flight: None,
            poller: None,
            poll_interval: config.poll_interval(),
            charts_dirty: false,
        }
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    /// Switch profile kind and refresh.
    pub fn select_profile(&mut self, kind: ProfileKind) -> u64 {
        log::info!("[TABLE] Profile selected: {}", kind);
        self.session.profile = kind;
        self.refresh_table(false)
    }

    /// Store the filter text verbatim (empty clears it) and refresh.
    pub fn set_filter(&mut self, filter: impl Into<String>) -> u64 {
        self.session.filter = filter.into();
        self.refresh_table(false)
    }

    /// Store the cumulative-sort flag and refresh.
    pub fn set_cumsort(&mut self, cumsort: bool) -> u64 {
        self.session.cumsort = cumsort;
        self.refresh_table(false)
    }

    /// The request `refresh_table(force)` would send right now
    pub fn current_query(&self, force: bool) -> TableQuery {
        TableQuery {
            profile: self.session.profile,
            filter: self.session.filter.clone(),
            cumsort: self.session.cumsort,
            force,
        }
    }

    /// Issue a table request and return its sequence number.
    ///
    /// Any request still outstanding is aborted; should its response arrive
    /// anyway it is discarded because its sequence number is no longer the
    /// latest.
    pub fn refresh_table(&mut self, force: bool) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;

        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                log::debug!("[TABLE] Aborting request #{} in favour of #{}", seq - 1, seq);
                previous.abort();
            }
        }

        let query = self.current_query(force);
        self.session.table.begin(seq, query.profile);

        let backend = Arc::clone(&self.backend);
        let events_tx = self.events_tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = backend.fetch_table(query).await;
            let _ = events_tx.send(DashboardEvent::TableLoaded { seq, result }).await;
        }));

        seq
    }

    /// Parse and run one prompt line. Parse errors land in the status line.
    pub fn submit_prompt(&mut self, input: &str) -> Result<(), CommandError> {
        match parse_command(input) {
            Ok(command) => {
                self.run_command(command);
                Ok(())
            }
            Err(e) => {
                log::debug!("[PROMPT] {}", e);
                self.session.status = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn run_command(&mut self, command: PromptCommand) -> u64 {
        match command {
            PromptCommand::SelectProfile(kind) => {
                self.session.filter.clear();
                self.select_profile(kind)
            }
            PromptCommand::ForceRefresh => self.refresh_table(true),
            PromptCommand::ToggleCumsort => {
                let flag = !self.session.cumsort;
                self.set_cumsort(flag)
            }
            PromptCommand::Filter(filter) => self.set_filter(filter),
        }
    }

    /// Start the repeating stats poller if it is not running.
    pub fn start_polling(&mut self) {
        if self.poller.is_some() {
            return;
        }
        self.poller = Some(StatsPoller::spawn(
            Arc::clone(&self.backend),
            self.poll_interval,
            self.events_tx.clone(),
        ));
    }

    /// Stop the poller; returns its completed cycle count when one was running.
    pub async fn stop_polling(&mut self) -> Option<u64> {
        match self.poller.take() {
            Some(handle) => Some(handle.stop().await),
            None => None,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().map_or(false, |p| !p.is_finished())
    }

    /// Run exactly one stats cycle inline: fetch, then update the buffers.
    pub async fn poll_stats(&mut self) -> bool {
        let result = self.backend.fetch_stats().await;
        self.apply_stats(result)
    }

    fn apply_stats(&mut self, result: Result<StatsSample, FetchError>) -> bool {
        match result {
            Ok(sample) => {
                self.session.stats.append(&sample);
                self.session.status = None;
                self.charts_dirty = true;
                true
            }
            Err(e) => {
                self.session.status = Some(format!("error fetching stats: {}", e));
                false
            }
        }
    }

    /// Apply one background event. Returns true when visible state changed.
    pub fn apply_event(&mut self, event: DashboardEvent) -> bool {
        match event {
            DashboardEvent::TableLoaded { seq, result } => self.session.table.apply(seq, result),
            DashboardEvent::StatsSampled(result) => {
                // A failed poll still changes the status line
                self.apply_stats(result);
                true
            }
        }
    }

    /// Drain every pending event without blocking. Returns how many changed state.
    pub fn process_events(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply_event(event) {
                changed += 1;
            }
        }
        changed
    }

    /// Wait for the next event and apply it. Returns false if the channel closed.
    pub async fn process_next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply_event(event);
                true
            }
            None => false,
        }
    }

    /// Returns and clears the charts-changed flag.
    pub fn take_charts_dirty(&mut self) -> bool {
        std::mem::take(&mut self.charts_dirty)
    }

    pub fn chart_model(&self) -> ChartModel {
        ChartModel::from_history(&self.session.stats)
    }

    /// Write the current results view to `path` as escaped HTML.
    pub fn export_html(&self, path: &Path) -> Result<(), AppError> {
        let view = self
            .session
            .table
            .results()
            .ok_or_else(|| AppError::InvalidInput("Nothing to export yet".to_string()))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, view.to_html())?;
        log::info!("[TABLE] Exported {} rows to {}", view.row_count(), path.display());
        Ok(())
    }
}

impl Drop for DashboardClient {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
