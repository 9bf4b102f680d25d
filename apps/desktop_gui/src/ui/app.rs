use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::{Color32, RichText};
use shared::protocol::{Narration, StatusLevel, StepEvent};
use stepper::{DelayControl, RunView};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::bars;

const MAX_UI_EVENTS_PER_FRAME: usize = 4096;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub initial_input: String,
    pub show_step_log: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            initial_input: "5, 3, 8, 4, 2, 7, 1, 6".to_string(),
            show_step_log: true,
        }
    }
}

pub struct VisualizerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    delay: DelayControl,
    input: String,
    view: RunView,
    /// A start was queued and neither `RunStarted` nor a rejection has come back yet.
    awaiting_start: bool,
    show_step_log: bool,
    backend_status: String,
    fatal_error: Option<UiError>,
}

impl VisualizerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        delay: DelayControl,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            delay,
            input: startup.initial_input,
            view: RunView::default(),
            awaiting_start: false,
            show_step_log: startup.show_step_log,
            backend_status: String::new(),
            fatal_error: None,
        }
    }

    fn controls_locked(&self) -> bool {
        self.awaiting_start || self.view.is_running() || self.fatal_error.is_some()
    }

    fn process_ui_events(&mut self) {
        for event in self.ui_rx.try_iter().take(MAX_UI_EVENTS_PER_FRAME) {
            match event {
                UiEvent::Info(message) => {
                    tracing::debug!(%message, "backend info");
                    self.backend_status = message;
                }
                UiEvent::Step(step) => {
                    match &step {
                        StepEvent::RunStarted { .. } | StepEvent::Rejected(_) => {
                            self.awaiting_start = false;
                        }
                        _ => {}
                    }
                    self.view.apply_event(&step);
                }
                UiEvent::Error(err) => {
                    tracing::warn!(category = ?err.category(), context = ?err.context(), "{}", err.message());
                    self.view.status = Some(Narration::error(err.message()));
                    if err.is_fatal() {
                        self.awaiting_start = false;
                        self.fatal_error = Some(err);
                    }
                }
            }
        }
    }

    fn request_sort(&mut self) {
        if self.controls_locked() {
            return;
        }
        let cmd = BackendCommand::StartRun {
            raw_input: self.input.clone(),
        };
        match dispatch_backend_command(&self.cmd_tx, cmd) {
            Ok(()) => {
                self.awaiting_start = true;
                self.view.status = Some(Narration::info("Starting Insertion Sort..."));
            }
            Err(err) => {
                self.view.status = Some(Narration::error(err.message()));
                if err.is_fatal() {
                    self.fatal_error = Some(err);
                }
            }
        }
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let locked = self.controls_locked();
        ui.horizontal(|ui| {
            ui.label("Numbers:");
            let response = ui.add_enabled(
                !locked,
                egui::TextEdit::singleline(&mut self.input)
                    .hint_text("e.g. 5, 3, 4, 1, 2")
                    .desired_width(360.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));

            let clicked = ui.add_enabled(!locked, egui::Button::new("Sort")).clicked();
            if clicked || submitted {
                self.request_sort();
            }

            ui.separator();

            // The delay stays adjustable mid-run; only later pauses pick it up.
            let (min_ms, max_ms) = self.delay.bounds_ms();
            let mut delay_ms = self.delay.current_ms();
            let slider = ui.add(
                egui::Slider::new(&mut delay_ms, min_ms..=max_ms)
                    .text("Delay")
                    .show_value(false),
            );
            if slider.changed() {
                self.delay.set(Duration::from_millis(delay_ms));
            }
            ui.label(format!("{} ms", self.delay.current_ms()));

            ui.separator();
            ui.checkbox(&mut self.show_step_log, "Step log");
        });
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| match &self.view.status {
            Some(status) => {
                ui.label(RichText::new(&status.message).color(level_color(status.level, ui)));
            }
            None => {
                ui.weak(&self.backend_status);
            }
        });
    }

    fn show_step_log(&self, ui: &mut egui::Ui) {
        ui.heading("Steps");
        ui.separator();
        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (index, entry) in self.view.log.entries().iter().enumerate() {
                    ui.label(
                        RichText::new(format!("{:>3}. {}", index + 1, entry.message))
                            .monospace()
                            .color(level_color(entry.level, ui)),
                    );
                }
            });
    }
}

fn level_color(level: StatusLevel, ui: &egui::Ui) -> Color32 {
    match level {
        StatusLevel::Info => ui.visuals().text_color(),
        StatusLevel::Warning => Color32::from_rgb(255, 165, 0),
        StatusLevel::Error => Color32::from_rgb(220, 50, 47),
        StatusLevel::Success => Color32::from_rgb(46, 160, 67),
    }
}

impl eframe::App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(6.0);
            self.show_controls(ui);
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.add_space(4.0);
            self.show_status(ui);
            ui.add_space(4.0);
        });

        if self.show_step_log {
            egui::SidePanel::right("step_log")
                .resizable(true)
                .default_width(360.0)
                .show(ctx, |ui| self.show_step_log(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| bars::paint_board(ui, &self.view.board));

        if self.controls_locked() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
