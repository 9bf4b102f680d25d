use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

use crate::{input::DEFAULT_LARGE_INPUT_THRESHOLD, pacing::DelayControl};

pub const DEFAULT_SETTINGS_FILE: &str = "visualizer.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub delay_ms: u64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub large_input_threshold: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delay_ms: 500,
            min_delay_ms: 10,
            max_delay_ms: 2000,
            large_input_threshold: DEFAULT_LARGE_INPUT_THRESHOLD,
        }
    }
}

impl Settings {
    pub fn delay_control(&self) -> DelayControl {
        DelayControl::new(
            Duration::from_millis(self.delay_ms),
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    delay_ms: Option<u64>,
    min_delay_ms: Option<u64>,
    max_delay_ms: Option<u64>,
    large_input_threshold: Option<usize>,
}

/// Defaults, then `visualizer.toml` in the working directory, then `APP__*` env vars.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if path.exists() {
        match read_file_settings(path) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(err) => tracing::warn!("ignoring settings file: {err:#}"),
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse '{}'", path.display()))
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.delay_ms {
        settings.delay_ms = v;
    }
    if let Some(v) = file_cfg.min_delay_ms {
        settings.min_delay_ms = v;
    }
    if let Some(v) = file_cfg.max_delay_ms {
        settings.max_delay_ms = v;
    }
    if let Some(v) = file_cfg.large_input_threshold {
        settings.large_input_threshold = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = parsed_env(&lookup, "APP__DELAY_MS") {
        settings.delay_ms = v;
    }
    if let Some(v) = parsed_env(&lookup, "APP__MIN_DELAY_MS") {
        settings.min_delay_ms = v;
    }
    if let Some(v) = parsed_env(&lookup, "APP__MAX_DELAY_MS") {
        settings.max_delay_ms = v;
    }
    if let Some(v) = parsed_env::<usize>(&lookup, "APP__LARGE_INPUT_THRESHOLD") {
        settings.large_input_threshold = v;
    }
}

fn parsed_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(%name, value = %raw, "ignoring unparsable setting override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("visualizer.toml");
        fs::write(&path, "delay_ms = 120\nlarge_input_threshold = 10\n").expect("write");

        let mut settings = Settings::default();
        apply_file_settings(&mut settings, read_file_settings(&path).expect("parse"));

        assert_eq!(settings.delay_ms, 120);
        assert_eq!(settings.large_input_threshold, 10);
        assert_eq!(settings.max_delay_ms, 2000);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("visualizer.toml");
        fs::write(&path, "delay_ms = \"fast\"").expect("write");

        let err = read_file_settings(&path).expect_err("should fail");
        assert!(format!("{err:#}").contains("failed to parse"));
    }

    #[test]
    fn env_overrides_skip_unparsable_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("APP__DELAY_MS", "75"),
            ("APP__MAX_DELAY_MS", "soon"),
        ]);
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.delay_ms, 75);
        assert_eq!(settings.max_delay_ms, 2000);
    }

    #[test]
    fn delay_control_respects_configured_bounds() {
        let settings = Settings {
            delay_ms: 5000,
            ..Settings::default()
        };
        assert_eq!(settings.delay_control().current_ms(), 2000);
    }
}
