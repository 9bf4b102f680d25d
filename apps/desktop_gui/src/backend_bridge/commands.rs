//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    /// Raw text from the input field; parsing happens on the backend.
    StartRun { raw_input: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::StartRun { .. } => "start_run",
        }
    }
}
