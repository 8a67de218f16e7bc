//! Dashboard client: profile table and runtime sparklines
//!
//! - `client`: `DashboardClient`, the session object and background events
//! - `table`: table view state machine (latest request wins)
//! - `render`: structural results view and escaped HTML export
//! - `buffers`: bounded sample buffers with sentinel and running max
//! - `charts`: chart model derived from the buffers
//! - `poller`: cancellable repeating stats task
//! - `commands`: `:c`/`:h`/`:r`/`:s`/`:f=` prompt parser

pub mod buffers;
pub mod charts;
pub mod client;
pub mod commands;
pub mod poller;
pub mod render;
pub mod table;

pub use buffers::{RollingBuffer, StatsHistory};
pub use charts::{ChartModel, ChartSeries};
pub use client::{DashboardClient, DashboardEvent, DashboardSession};
pub use commands::{parse_command, PromptCommand};
pub use poller::{PollerHandle, StatsPoller};
pub use render::{RenderedRow, ResultsView};
pub use table::{TableState, TableView};
