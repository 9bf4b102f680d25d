//! UI layer for desktop GUI: app shell and the bar chart.

pub mod app;
pub mod bars;

pub use app::{StartupConfig, VisualizerApp};
