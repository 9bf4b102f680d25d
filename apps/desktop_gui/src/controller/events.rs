//! UI/backend events and error modeling for desktop GUI controller.

use shared::protocol::StepEvent;

pub enum UiEvent {
    Info(String),
    Step(StepEvent),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Busy,
    Backend,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Run,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if context == UiErrorContext::BackendStartup
            || message_lower.contains("backend")
            || message_lower.contains("runtime")
            || message_lower.contains("disconnected")
            || message_lower.contains("aborted")
        {
            UiErrorCategory::Backend
        } else if message_lower.contains("queue is full") {
            UiErrorCategory::Busy
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Backend failures leave the app unable to start runs until restarted.
    pub fn is_fatal(&self) -> bool {
        self.category == UiErrorCategory::Backend
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
