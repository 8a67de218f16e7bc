/// Main App and UI State Management
///
/// This module provides the eframe::App implementation for the dashboard. It
/// drains background events from the `DashboardClient` every frame, then
/// draws the controls, the sparklines and the report table from the session.

use crate::dashboard::render::{ResultsView, BAR_SCALE_PX, COLUMNS};
use crate::dashboard::table::{loading_message, TableState};
use crate::dashboard::DashboardClient;
use crate::log_collector::LogLine;
use crate::models::ProfileKind;
use crate::ui::widgets;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Lines kept in the log panel
const MAX_LOG_LINES: usize = 500;

/// Transient UI state - state that doesn't persist across sessions
#[derive(Clone)]
pub struct UIState {
    /// Dirty flag: set when data changes, cleared after render
    pub needs_repaint: bool,

    /// Filter text box contents, sent verbatim on change
    pub filter_input: String,

    /// Prompt line (`:c`, `:h`, `:r`, `:s`, `:f=<regex>`)
    pub prompt_input: String,

    /// Log panel buffer (fixed-size VecDeque of last N lines for O(1) appends)
    pub log_lines: VecDeque<String>,

    pub show_log: bool,

    /// Error message to display (if any)
    pub error_message: Option<String>,

    /// Informational message (export results)
    pub info_message: Option<String>,
}

impl Default for UIState {
    fn default() -> Self {
        Self {
            needs_repaint: true,
            filter_input: String::new(),
            prompt_input: String::new(),
            log_lines: VecDeque::with_capacity(MAX_LOG_LINES),
            show_log: false,
            error_message: None,
            info_message: None,
        }
    }
}

pub struct DashboardApp {
    client: DashboardClient,
    ui_state: UIState,
    log_rx: Option<mpsc::Receiver<LogLine>>,
    poll_interval: Duration,
    export_dir: PathBuf,
}

impl DashboardApp {
    /// Wrap a client. Polling and the first table request are started here
    /// if the caller has not already done so.
    pub fn new(
        mut client: DashboardClient,
        log_rx: Option<mpsc::Receiver<LogLine>>,
        poll_interval: Duration,
    ) -> Self {
        client.start_polling();
        if client.session().table.latest_seq() == 0 {
            client.refresh_table(false);
        }

        let ui_state = UIState {
            filter_input: client.session().filter.clone(),
            ..UIState::default()
        };

        Self {
            client,
            ui_state,
            log_rx,
            poll_interval,
            export_dir: PathBuf::from("exports"),
        }
    }

    /// Apply pending client events and log lines.
    fn process_events(&mut self) {
        if self.client.process_events() > 0 {
            self.ui_state.needs_repaint = true;
        }

        if let Some(rx) = self.log_rx.as_mut() {
            while let Ok(line) = rx.try_recv() {
                if self.ui_state.log_lines.len() >= MAX_LOG_LINES {
                    self.ui_state.log_lines.pop_front();
                }
                self.ui_state.log_lines.push_back(line.formatted());
                self.ui_state.needs_repaint = true;
            }
        }
    }

    /// Profile buttons, refresh, filter, cumsort, prompt and export
    fn render_controls(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("pprof Dashboard");
                ui.separator();

                let current = self.client.session().profile;
                for kind in ProfileKind::all() {
                    if ui.selectable_label(current == kind, kind.label()).clicked() {
                        self.client.select_profile(kind);
                    }
                }

                if ui.button("Refresh").on_hover_text("Force a new profile").clicked() {
                    self.client.refresh_table(true);
                }

                let mut cumsort = self.client.session().cumsort;
                if ui.checkbox(&mut cumsort, "Sort by cum").changed() {
                    self.client.set_cumsort(cumsort);
                }

                ui.separator();
                ui.label("Filter:");
                let filter = ui.add(
                    egui::TextEdit::singleline(&mut self.ui_state.filter_input)
                        .hint_text("regex")
                        .desired_width(200.0),
                );
                if filter.changed() {
                    self.client.set_filter(self.ui_state.filter_input.clone());
                }

                ui.separator();
                if ui.button("Export HTML").clicked() {
                    self.export_html();
                }
            });

            ui.horizontal(|ui| {
                ui.label("Command:");
                let prompt = ui.add(
                    egui::TextEdit::singleline(&mut self.ui_state.prompt_input)
                        .hint_text(":c  :h  :r  :s  :f=<regex>")
                        .desired_width(260.0),
                );
                if prompt.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    let line = std::mem::take(&mut self.ui_state.prompt_input);
                    if self.client.submit_prompt(&line).is_ok() {
                        // Commands may replace the filter (`:f=` or a profile switch)
                        self.ui_state.filter_input = self.client.session().filter.clone();
                    }
                    prompt.request_focus();
                }
            });

            if let Some(ref status) = self.client.session().status {
                ui.colored_label(egui::Color32::from_rgb(255, 100, 100), status);
            }
        });
    }

    /// Render transient messages (errors, info)
    fn render_messages(&mut self, ctx: &egui::Context) {
        if let Some(ref msg) = self.ui_state.error_message.clone() {
            egui::TopBottomPanel::top("error_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::from_rgb(255, 100, 100), format!("Error: {}", msg));
                    if ui.button("Dismiss").clicked() {
                        self.ui_state.error_message = None;
                    }
                });
            });
        }

        if let Some(ref msg) = self.ui_state.info_message.clone() {
            egui::TopBottomPanel::top("info_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::from_rgb(100, 150, 255), msg);
                    if ui.button("Dismiss").clicked() {
                        self.ui_state.info_message = None;
                    }
                });
            });
        }
    }

    fn render_charts(&mut self, ctx: &egui::Context) {
        let model = self.client.chart_model();
        egui::SidePanel::right("charts")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.heading("Runtime");
                ui.add_space(4.0);
                for series in &model.series {
                    widgets::sparkline(ui, &series.values, model.range_max, &series.title);
                    ui.add_space(8.0);
                }
            });
    }

    fn render_log_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("log_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.toggle_value(&mut self.ui_state.show_log, "Log");
                if self.ui_state.show_log && ui.small_button("Clear").clicked() {
                    self.ui_state.log_lines.clear();
                }
            });
            if self.ui_state.show_log {
                widgets::terminal_viewport(ui, self.ui_state.log_lines.iter());
            }
        });
    }

    fn render_results(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| match self.client.session().table.state() {
            TableState::Idle => {
                ui.label("Select a profile to load.");
            }
            TableState::Loading { profile, .. } => {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label(loading_message(*profile));
                });
            }
            TableState::Rendered(ResultsView::Table(rows)) => {
                if rows.is_empty() {
                    ui.label("No rows.");
                    return;
                }
                TableBuilder::new(ui)
                    .striped(true)
                    .column(Column::exact(BAR_SCALE_PX + 8.0))
                    .columns(Column::auto().at_least(60.0), COLUMNS.len() - 1)
                    .column(Column::remainder())
                    .header(20.0, |mut header| {
                        header.col(|_ui| {});
                        for title in COLUMNS {
                            header.col(|ui| {
                                ui.strong(title);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(18.0, rows.len(), |mut row| {
                            let rendered = &rows[row.index()];
                            row.col(|ui| widgets::score_bar(ui, rendered.bar_fraction));
                            for cell in &rendered.cells {
                                row.col(|ui| {
                                    ui.label(cell);
                                });
                            }
                        });
                    });
            }
            TableState::Rendered(ResultsView::Text(text)) | TableState::Errored(text) => {
                egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                    ui.monospace(text);
                });
            }
        });
    }

    fn export_html(&mut self) {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = self.export_dir.join(format!(
            "pprof_{}_{}.html",
            self.client.session().profile.as_str(),
            timestamp
        ));
        match self.client.export_html(&path) {
            Ok(()) => {
                self.ui_state.info_message = Some(format!("Exported to {}", path.display()));
                self.ui_state.error_message = None;
            }
            Err(e) => {
                log::warn!("[TABLE] Export failed: {}", e);
                self.ui_state.error_message = Some(e.user_message());
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process all pending async events (sets needs_repaint flag on data changes)
        self.process_events();
        if self.client.take_charts_dirty() {
            self.ui_state.needs_repaint = true;
        }

        if self.ui_state.needs_repaint {
            ctx.request_repaint();
            self.ui_state.needs_repaint = false;
        }
        // Wake up for the next stats sample even if nothing else happens
        ctx.request_repaint_after(self.poll_interval);

        self.render_controls(ctx);
        self.render_messages(ctx);
        self.render_log_panel(ctx);
        self.render_charts(ctx);
        self.render_results(ctx);
    }
}
