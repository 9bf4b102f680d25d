//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::protocol::StepEvent;
use stepper::{DelayControl, SortSession};
use tokio::sync::broadcast::error::RecvError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    delay: DelayControl,
    large_input_threshold: usize,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let session = SortSession::new(delay, large_input_threshold);
            let forwarder = tokio::spawn(forward_step_events(
                session.subscribe_events(),
                ui_tx.clone(),
            ));
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            // Blocking recv keeps this thread parked; runs execute on the worker threads.
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::StartRun { raw_input } => match session.start_from_input(&raw_input) {
                        Ok(handle) => {
                            let ui_tx = ui_tx.clone();
                            tokio::spawn(async move {
                                if let Err(err) = handle.await {
                                    tracing::error!("sort run task failed: {err}");
                                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                        UiErrorContext::Run,
                                        format!("sort run aborted unexpectedly: {err}"),
                                    )));
                                }
                            });
                        }
                        // Rejections already reached the UI through the event stream.
                        Err(err) => {
                            tracing::debug!(error = %err, busy = err.is_busy(), "start rejected");
                        }
                    },
                }
            }

            tracing::info!("ui command queue closed; stopping backend worker");
            forwarder.abort();
        });
    });
}

/// Relays step events into the UI queue without ever blocking a runtime
/// worker. Events that do not fit are counted and reported once the queue
/// has room again.
async fn forward_step_events(
    mut events: tokio::sync::broadcast::Receiver<StepEvent>,
    ui_tx: Sender<UiEvent>,
) {
    let mut skipped: u64 = 0;
    loop {
        match events.recv().await {
            Ok(event) => match ui_tx.try_send(UiEvent::Step(event)) {
                Ok(()) => {
                    if skipped > 0 && report_skipped(&ui_tx, skipped) {
                        skipped = 0;
                    }
                }
                Err(TrySendError::Full(_)) => skipped += 1,
                Err(TrySendError::Disconnected(_)) => {
                    tracing::debug!("ui event queue closed; stopping step forwarder");
                    return;
                }
            },
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "step forwarder fell behind the run");
                skipped += missed;
                if report_skipped(&ui_tx, skipped) {
                    skipped = 0;
                }
            }
            Err(RecvError::Closed) => return,
        }
    }
}

fn report_skipped(ui_tx: &Sender<UiEvent>, skipped: u64) -> bool {
    tracing::warn!(skipped, "ui fell behind the step stream");
    ui_tx
        .try_send(UiEvent::Error(UiError::from_message(
            UiErrorContext::Run,
            format!("display skipped {skipped} step events; the view may be stale"),
        )))
        .is_ok()
}
