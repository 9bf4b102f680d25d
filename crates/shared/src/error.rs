use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejections raised while turning raw user text into a sequence.
///
/// Both are detected before a run starts and never touch run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputError {
    #[error("Please enter some numbers.")]
    EmptyInput,
    #[error("No valid numbers entered.")]
    NoValidNumbers,
}
