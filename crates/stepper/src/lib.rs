use shared::{
    domain::ElementState,
    protocol::{Narration, StateDelta, VisualStep},
};
use tracing::{debug, info};

pub mod board;
pub mod config;
pub mod error;
pub mod input;
pub mod pacing;
mod session;

pub use board::{Bar, Board, NarrationLog, RunView};
pub use error::SessionError;
pub use input::{parse_sequence, ParsedInput};
pub use pacing::{DelayControl, DelayPacer, InstantPacer, Pacer};
pub use session::{SortSession, BUSY_MESSAGE};

pub const EMPTY_SEQUENCE_MESSAGE: &str = "Nothing to sort: the sequence is empty.";
pub const COMPLETE_MESSAGE: &str = "Sorting Complete!";

/// Receives the visual and narration side effects of a run.
///
/// Callbacks fire in algorithm order; a narration always precedes the
/// suspension that follows it.
pub trait StepObserver: Send {
    /// Container reset with one element per position, fired once per run.
    fn on_reset(&mut self, _values: &[i64]) {}
    fn on_visual_step(&mut self, step: &VisualStep);
    fn on_narrate(&mut self, narration: &Narration);
    fn on_complete(&mut self, _sorted: &[i64]) {}
}

/// Insertion sort with observation points.
pub struct Stepper<P: Pacer> {
    pacer: P,
}

impl<P: Pacer> Stepper<P> {
    pub fn new(pacer: P) -> Self {
        Self { pacer }
    }

    /// Sorts `values` ascending, reporting each step to `observer` and
    /// suspending through the pacer between steps. Returns the sorted sequence.
    pub async fn run<O: StepObserver + ?Sized>(
        &self,
        mut values: Vec<i64>,
        observer: &mut O,
    ) -> Vec<i64> {
        let n = values.len();
        info!(len = n, "insertion sort run started");
        observer.on_reset(&values);

        if n == 0 {
            observer.on_narrate(&Narration::info(EMPTY_SEQUENCE_MESSAGE));
            observer.on_complete(&values);
            info!("insertion sort run finished on empty input");
            return values;
        }

        emit(observer, 0, values[0], StateDelta::add(&[ElementState::Sorted]));

        for i in 1..n {
            self.insert_key(&mut values, i, observer).await;
        }

        self.finish(&values, observer);
        values
    }

    async fn insert_key<O: StepObserver + ?Sized>(
        &self,
        values: &mut [i64],
        i: usize,
        observer: &mut O,
    ) {
        let key = values[i];
        debug!(index = i, key, "key selected");
        observer.on_narrate(&Narration::info(format!(
            "Selecting element {key} at index {i} as key."
        )));
        emit(observer, i, key, StateDelta::add(&[ElementState::KeySelected]));
        self.pacer.suspend().await;

        // `hole` is j + 1: the slot the key would land in if scanning stopped now.
        let mut hole = i;
        while hole > 0 && values[hole - 1] > key {
            let j = hole - 1;
            let shifted = values[j];
            debug!(index = j, value = shifted, key, "shifting right");
            observer.on_narrate(&Narration::info(format!(
                "Comparing key {key} with {shifted} at index {j}. {shifted} > {key}, shifting {shifted} right."
            )));
            emit(
                observer,
                j,
                shifted,
                StateDelta::add(&[ElementState::Comparing, ElementState::Shifting]),
            );
            emit(
                observer,
                hole,
                values[hole],
                StateDelta::add(&[ElementState::Shifting]),
            );
            self.pacer.suspend().await;

            values[hole] = shifted;
            emit(
                observer,
                hole,
                shifted,
                StateDelta::remove(&[ElementState::Shifting]),
            );
            emit(
                observer,
                j,
                shifted,
                StateDelta::remove(&[ElementState::Comparing, ElementState::Shifting])
                    .with_added(ElementState::Sorted),
            );
            hole = j;

            if hole > 0 {
                let next = hole - 1;
                observer.on_narrate(&Narration::info(format!(
                    "Moving comparison to index {next}."
                )));
                emit(
                    observer,
                    next,
                    values[next],
                    StateDelta::add(&[ElementState::Comparing]),
                );
            } else {
                observer.on_narrate(&Narration::info(format!(
                    "Key {key} needs to be inserted at index 0."
                )));
            }
            self.pacer.suspend().await;

            if hole > 0 {
                let next = hole - 1;
                emit(
                    observer,
                    next,
                    values[next],
                    StateDelta::remove(&[ElementState::Comparing]),
                );
            }
        }

        if hole > 0 {
            let j = hole - 1;
            let stopper = values[j];
            observer.on_narrate(&Narration::info(format!(
                "Comparing key {key} with {stopper} at index {j}. {stopper} <= {key}, stopping."
            )));
        }

        observer.on_narrate(&Narration::info(format!(
            "Inserting key {key} at index {hole}."
        )));
        values[hole] = key;
        debug!(index = hole, key, "key inserted");
        emit(
            observer,
            hole,
            key,
            StateDelta::remove(&[ElementState::Comparing, ElementState::KeySelected])
                .with_added(ElementState::Sorted),
        );
        if hole != i {
            emit(
                observer,
                i,
                values[i],
                StateDelta::remove(&[ElementState::KeySelected]),
            );
        }

        for (k, value) in values.iter().enumerate().take(i + 1) {
            emit(observer, k, *value, StateDelta::settle());
        }
        self.pacer.suspend().await;
    }

    fn finish<O: StepObserver + ?Sized>(&self, values: &[i64], observer: &mut O) {
        for (k, value) in values.iter().enumerate() {
            emit(observer, k, *value, StateDelta::settle());
        }
        observer.on_narrate(&Narration::success(COMPLETE_MESSAGE));
        observer.on_complete(values);
        info!(len = values.len(), "insertion sort run finished");
    }
}

fn emit<O: StepObserver + ?Sized>(observer: &mut O, index: usize, value: i64, delta: StateDelta) {
    observer.on_visual_step(&VisualStep {
        index,
        value,
        delta,
    });
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
