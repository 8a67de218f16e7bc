use clap::Parser;
use std::sync::Arc;
use tokio::sync::mpsc;

use pprof_dashboard::cli::Cli;
use pprof_dashboard::config::loader::{get_global_settings_path, load_or_default};
use pprof_dashboard::log_collector::{ensure_logs_dir_exists, get_global_logs_path};
use pprof_dashboard::ui::DashboardApp;
use pprof_dashboard::{DashboardClient, HttpBackend, LogCollector, LogLine};

#[tokio::main]
async fn main() -> pprof_dashboard::Result<()> {
    let cli = Cli::parse();

    // =========================================================================
    // CONFIGURATION - FILE, THEN FLAGS
    // =========================================================================
    let settings_path = match cli.config.clone() {
        Some(path) => path,
        None => get_global_settings_path()?,
    };
    let config = cli.apply_overrides(load_or_default(&settings_path)?);
    config.validate()?;
    eprintln!("[Main] ✓ Settings resolved (target={})", config.target);

    // =========================================================================
    // ROBUST LOG COLLECTOR - DECOUPLED FROM UI
    // =========================================================================
    let log_dir = match config.log_dir.clone() {
        Some(dir) => dir,
        None => match get_global_logs_path() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("[Main] ERROR: Failed to get global logs path: {}", e);
                return Err(format!("Failed to determine logs directory: {}", e).into());
            }
        },
    };
    ensure_logs_dir_exists(&log_dir)?;

    let (log_ui_tx, log_ui_rx) = mpsc::channel::<LogLine>(1024);
    let log_collector = match LogCollector::new(log_dir, log_ui_tx) {
        Ok(collector) => {
            eprintln!("[Main] ✓ LogCollector initialized ({})", collector.log_path().display());
            Arc::new(collector)
        }
        Err(e) => {
            eprintln!("[Main] WARNING: LogCollector initialization failed: {}", e);
            return Err(format!("LogCollector initialization failed: {}", e).into());
        }
    };

    // Wire LogCollector as the global logger for the `log` crate
    let max_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    if let Err(e) = log::set_boxed_logger(Box::new((*log_collector).clone()))
        .map(|()| log::set_max_level(max_level))
    {
        eprintln!("[Main] WARNING: Failed to set LogCollector as global logger: {}", e);
    }

    log::info!(
        "[CONFIG] target={} poll={}ms history={} timeout={}s",
        config.target,
        config.poll_interval_ms,
        config.history_len,
        config.request_timeout_secs
    );

    // =========================================================================
    // CLIENT SETUP
    // =========================================================================
    let backend = HttpBackend::new(&config)?;
    let client = DashboardClient::new(Arc::new(backend), &config);
    let app = DashboardApp::new(client, Some(log_ui_rx), config.poll_interval());

    // =========================================================================
    // LAUNCH EGUI
    // =========================================================================
    eprintln!("[Main] Launching egui frontend...");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "pprof Dashboard",
        options,
        Box::new(move |_cc| Box::new(app)),
    );

    // =========================================================================
    // SHUTDOWN
    // =========================================================================
    if let Err(e) = log_collector.wait_for_empty().await {
        eprintln!("[Main] WARNING: Failed to wait for log collector to empty: {}", e);
    }

    eprintln!("[Main] Application shutting down.");

    result.map_err(|e| e.into())
}
