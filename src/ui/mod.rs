//! UI Module - egui integration
//!
//! `DashboardApp` renders a `DashboardClient`; everything it draws comes from
//! the client's session, so the dashboard logic stays testable without egui.

pub mod app;
pub mod widgets;

pub use app::{DashboardApp, UIState};
