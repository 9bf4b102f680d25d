use serde::{Deserialize, Serialize};

use crate::domain::{ElementState, TRANSIENT_STATES};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    #[default]
    Info,
    Warning,
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narration {
    pub message: String,
    #[serde(default)]
    pub level: StatusLevel,
}

impl Narration {
    pub fn new(level: StatusLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Error, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Success, message)
    }
}

/// States added to and removed from one position. Removal is applied first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDelta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<ElementState>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<ElementState>,
}

impl StateDelta {
    pub fn add(states: &[ElementState]) -> Self {
        Self {
            added: states.to_vec(),
            removed: Vec::new(),
        }
    }

    pub fn remove(states: &[ElementState]) -> Self {
        Self {
            added: Vec::new(),
            removed: states.to_vec(),
        }
    }

    /// Marks the position sorted and drops every transient class.
    pub fn settle() -> Self {
        Self {
            added: vec![ElementState::Sorted],
            removed: TRANSIENT_STATES.to_vec(),
        }
    }

    pub fn with_added(mut self, state: ElementState) -> Self {
        self.added.push(state);
        self
    }
}

/// One render-sink update: the value now shown at `index` plus its state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualStep {
    pub index: usize,
    pub value: i64,
    pub delta: StateDelta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum StepEvent {
    RunStarted { values: Vec<i64> },
    Visual(VisualStep),
    Narrated(Narration),
    RunCompleted { sorted: Vec<i64> },
    Rejected(Narration),
}

impl StepEvent {
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
