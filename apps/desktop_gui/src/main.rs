use std::{path::PathBuf, time::Duration};

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use stepper::config::{load_settings, load_settings_from};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{StartupConfig, VisualizerApp};

#[derive(Parser, Debug)]
#[command(about = "Insertion sort step visualizer")]
struct Args {
    /// Pre-filled comma-separated input.
    #[arg(long)]
    values: Option<String>,
    #[arg(long)]
    delay_ms: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    hide_step_log: bool,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    let delay = settings.delay_control();
    if let Some(delay_ms) = args.delay_ms {
        delay.set(Duration::from_millis(delay_ms));
    }

    let mut startup = StartupConfig::default();
    if let Some(values) = args.values {
        startup.initial_input = values;
    }
    startup.show_step_log = !args.hide_step_log;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(8192);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, delay.clone(), settings.large_input_threshold);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Insertion Sort Visualizer")
            .with_inner_size([1100.0, 640.0])
            .with_min_inner_size([720.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Insertion Sort Visualizer",
        options,
        Box::new(move |_cc| Ok(Box::new(VisualizerApp::new(cmd_tx, ui_rx, delay, startup)))),
    )
}
