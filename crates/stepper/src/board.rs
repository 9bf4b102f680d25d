//! Render-side model of a run: bars with state classes plus the narration log.

use std::collections::BTreeSet;

use shared::{
    domain::{ElementState, RunState},
    protocol::{Narration, StepEvent, VisualStep},
};

use crate::StepObserver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub value: i64,
    pub states: BTreeSet<ElementState>,
}

impl Bar {
    fn new(value: i64) -> Self {
        Self {
            value,
            states: BTreeSet::new(),
        }
    }

    pub fn has(&self, state: ElementState) -> bool {
        self.states.contains(&state)
    }

    /// The class a renderer colours the bar by; `None` means unsorted.
    pub fn primary_state(&self) -> Option<ElementState> {
        [
            ElementState::Shifting,
            ElementState::Comparing,
            ElementState::KeySelected,
            ElementState::Sorted,
        ]
        .into_iter()
        .find(|state| self.has(*state))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    bars: Vec<Bar>,
}

impl Board {
    pub fn new(values: &[i64]) -> Self {
        let mut board = Self::default();
        board.reset(values);
        board
    }

    pub fn reset(&mut self, values: &[i64]) {
        self.bars = values.iter().copied().map(Bar::new).collect();
    }

    /// Applies one update. Out-of-range indices are ignored.
    pub fn apply(&mut self, step: &VisualStep) {
        let Some(bar) = self.bars.get_mut(step.index) else {
            tracing::warn!(index = step.index, len = self.bars.len(), "visual step outside board");
            return;
        };
        bar.value = step.value;
        for state in &step.delta.removed {
            bar.states.remove(state);
        }
        for state in &step.delta.added {
            bar.states.insert(*state);
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn values(&self) -> Vec<i64> {
        self.bars.iter().map(|bar| bar.value).collect()
    }

    pub fn max_value(&self) -> Option<i64> {
        self.bars.iter().map(|bar| bar.value).max()
    }

    pub fn positions_with(&self, state: ElementState) -> Vec<usize> {
        self.bars
            .iter()
            .enumerate()
            .filter(|(_, bar)| bar.has(state))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn sorted_positions(&self) -> Vec<usize> {
        self.positions_with(ElementState::Sorted)
    }

    pub fn key_selected_positions(&self) -> Vec<usize> {
        self.positions_with(ElementState::KeySelected)
    }
}

/// Append-only narration for the current run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NarrationLog {
    entries: Vec<Narration>,
}

impl NarrationLog {
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, narration: Narration) {
        self.entries.push(narration);
    }

    pub fn entries(&self) -> &[Narration] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&Narration> {
        self.entries.last()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.message.as_str())
    }
}

/// Everything a front end shows about a run, fed either directly as a
/// [`StepObserver`] or from the session's event stream.
#[derive(Debug, Clone, Default)]
pub struct RunView {
    pub board: Board,
    pub log: NarrationLog,
    /// Latest status line. Rejections land here without touching the board or log.
    pub status: Option<Narration>,
    pub run_state: RunState,
    pub sorted: Option<Vec<i64>>,
}

impl RunView {
    pub fn apply_event(&mut self, event: &StepEvent) {
        match event {
            StepEvent::RunStarted { values } => self.on_reset(values),
            StepEvent::Visual(step) => self.on_visual_step(step),
            StepEvent::Narrated(narration) => self.on_narrate(narration),
            StepEvent::RunCompleted { sorted } => self.on_complete(sorted),
            StepEvent::Rejected(narration) => self.status = Some(narration.clone()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running()
    }
}

impl StepObserver for RunView {
    fn on_reset(&mut self, values: &[i64]) {
        self.board.reset(values);
        self.log.clear();
        self.sorted = None;
        self.run_state = RunState::Running;
    }

    fn on_visual_step(&mut self, step: &VisualStep) {
        self.board.apply(step);
    }

    fn on_narrate(&mut self, narration: &Narration) {
        self.status = Some(narration.clone());
        self.log.push(narration.clone());
    }

    fn on_complete(&mut self, sorted: &[i64]) {
        self.sorted = Some(sorted.to_vec());
        self.run_state = RunState::Complete;
    }
}
