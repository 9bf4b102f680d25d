use std::sync::{Arc, Mutex, PoisonError};

use shared::{
    domain::RunState,
    protocol::{Narration, StepEvent, VisualStep},
};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    config::Settings,
    error::SessionError,
    input::parse_sequence,
    pacing::{DelayControl, DelayPacer},
    StepObserver, Stepper,
};

const EVENT_CAPACITY: usize = 4096;
pub const BUSY_MESSAGE: &str = "A sort is already running; wait for it to finish.";

/// Owns the single-run guard, the live delay setting and the event fan-out.
pub struct SortSession {
    state: Arc<Mutex<RunState>>,
    delay: DelayControl,
    large_input_threshold: usize,
    events: broadcast::Sender<StepEvent>,
}

impl SortSession {
    pub fn new(delay: DelayControl, large_input_threshold: usize) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(RunState::Idle)),
            delay,
            large_input_threshold,
            events,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.delay_control(), settings.large_input_threshold)
    }

    pub fn delay(&self) -> &DelayControl {
        &self.delay
    }

    pub fn run_state(&self) -> RunState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StepEvent> {
        self.events.subscribe()
    }

    /// Parses `raw` and starts a run. The busy check comes first, so input
    /// typed during a run is rejected as busy, not validated.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_from_input(&self, raw: &str) -> Result<JoinHandle<Vec<i64>>, SessionError> {
        if self.run_state().is_running() {
            return Err(self.reject_busy());
        }

        let parsed = match parse_sequence(raw, self.large_input_threshold) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "rejected sort input");
                let _ = self
                    .events
                    .send(StepEvent::Rejected(Narration::error(err.to_string())));
                return Err(err.into());
            }
        };

        let guard = self.try_begin()?;
        let notice = parsed.warning.map(Narration::warning);
        Ok(self.spawn_run(parsed.values, guard, notice))
    }

    /// Starts a run over an already validated sequence.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, values: Vec<i64>) -> Result<JoinHandle<Vec<i64>>, SessionError> {
        let guard = self.try_begin()?;
        Ok(self.spawn_run(values, guard, None))
    }

    pub async fn run_to_completion(&self, values: Vec<i64>) -> Result<Vec<i64>, SessionError> {
        let handle = self.start(values)?;
        Ok(handle.await?)
    }

    fn try_begin(&self) -> Result<RunGuard, SessionError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_running() {
            drop(state);
            return Err(self.reject_busy());
        }
        *state = RunState::Running;
        Ok(RunGuard {
            state: Arc::clone(&self.state),
        })
    }

    fn reject_busy(&self) -> SessionError {
        warn!("rejected sort start while another run is active");
        let _ = self
            .events
            .send(StepEvent::Rejected(Narration::warning(BUSY_MESSAGE)));
        SessionError::AlreadyRunning
    }

    fn spawn_run(
        &self,
        values: Vec<i64>,
        guard: RunGuard,
        notice: Option<Narration>,
    ) -> JoinHandle<Vec<i64>> {
        info!(len = values.len(), delay_ms = self.delay.current_ms(), "starting sort run");
        let stepper = Stepper::new(DelayPacer::new(self.delay.clone()));
        let mut observer = BroadcastObserver {
            events: self.events.clone(),
            guard: Some(guard),
            notice,
        };
        tokio::spawn(async move { stepper.run(values, &mut observer).await })
    }
}

/// Flips the run state back once the run ends, including on panic.
struct RunGuard {
    state: Arc<Mutex<RunState>>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = RunState::Complete;
    }
}

struct BroadcastObserver {
    events: broadcast::Sender<StepEvent>,
    guard: Option<RunGuard>,
    /// Published right after `RunStarted`, so it survives the sink reset.
    notice: Option<Narration>,
}

impl BroadcastObserver {
    fn publish(&self, event: StepEvent) {
        // No subscribers is fine; the run still completes.
        let _ = self.events.send(event);
    }
}

impl StepObserver for BroadcastObserver {
    fn on_reset(&mut self, values: &[i64]) {
        self.publish(StepEvent::RunStarted {
            values: values.to_vec(),
        });
        if let Some(notice) = self.notice.take() {
            self.publish(StepEvent::Narrated(notice));
        }
    }

    fn on_visual_step(&mut self, step: &VisualStep) {
        self.publish(StepEvent::Visual(step.clone()));
    }

    fn on_narrate(&mut self, narration: &Narration) {
        self.publish(StepEvent::Narrated(narration.clone()));
    }

    fn on_complete(&mut self, sorted: &[i64]) {
        // Release before announcing so a listener reacting to completion can start again.
        self.guard.take();
        self.publish(StepEvent::RunCompleted {
            sorted: sorted.to_vec(),
        });
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
