//! Suspension between observation points.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;

/// Where the stepper yields back to the scheduler after each observation point.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn suspend(&self);
}

/// Never waits; used by headless runs and most tests.
pub struct InstantPacer;

#[async_trait]
impl Pacer for InstantPacer {
    async fn suspend(&self) {
        tokio::task::yield_now().await;
    }
}

/// Live-adjustable step delay shared between a control surface and a run.
///
/// The value is read when a suspension starts, so a change only affects
/// suspensions that have not begun yet.
#[derive(Debug, Clone)]
pub struct DelayControl {
    millis: Arc<AtomicU64>,
    min_ms: u64,
    max_ms: u64,
}

impl DelayControl {
    pub fn new(initial: Duration, min: Duration, max: Duration) -> Self {
        let min_ms = duration_millis(min);
        let max_ms = duration_millis(max).max(min_ms);
        let control = Self {
            millis: Arc::new(AtomicU64::new(min_ms)),
            min_ms,
            max_ms,
        };
        control.set(initial);
        control
    }

    /// Unbounded control, mostly for tests and one-shot CLI runs.
    pub fn fixed(delay: Duration) -> Self {
        Self::new(delay, Duration::ZERO, Duration::from_millis(u64::MAX))
    }

    pub fn current(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::Relaxed))
    }

    pub fn current_ms(&self) -> u64 {
        self.millis.load(Ordering::Relaxed)
    }

    /// Stores `delay` clamped to the configured bounds and returns the stored value.
    pub fn set(&self, delay: Duration) -> Duration {
        let clamped = duration_millis(delay).clamp(self.min_ms, self.max_ms);
        self.millis.store(clamped, Ordering::Relaxed);
        tracing::debug!(delay_ms = clamped, "step delay updated");
        Duration::from_millis(clamped)
    }

    pub fn bounds_ms(&self) -> (u64, u64) {
        (self.min_ms, self.max_ms)
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

pub struct DelayPacer {
    delay: DelayControl,
}

impl DelayPacer {
    pub fn new(delay: DelayControl) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Pacer for DelayPacer {
    async fn suspend(&self) {
        let delay = self.delay.current();
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
    }
}
