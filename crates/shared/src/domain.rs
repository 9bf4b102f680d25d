use serde::{Deserialize, Serialize};

/// Visual state class carried by a single bar.
///
/// A bar with no state is unsorted. Several classes can be active at once,
/// e.g. a bar being compared is also marked as shifting while its value moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementState {
    KeySelected,
    Comparing,
    Shifting,
    Sorted,
}

pub const TRANSIENT_STATES: [ElementState; 3] = [
    ElementState::KeySelected,
    ElementState::Comparing,
    ElementState::Shifting,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Complete,
}

impl RunState {
    pub fn is_running(self) -> bool {
        self == RunState::Running
    }
}
