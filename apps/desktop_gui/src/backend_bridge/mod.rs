//! Backend side of the GUI: command queue intake and the tokio worker thread.

pub mod commands;
pub mod runtime;
