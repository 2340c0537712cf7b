//! Optional TOML overrides for the round tuning.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use bead_hunt_core::RoundTuning;
use serde::Deserialize;

/// Tuning knobs a settings file may override; everything is optional and
/// absent fields keep their defaults.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Settings {
    fade_ms: Option<u64>,
    rest_ms: Option<u64>,
    slowdown_factor: Option<f64>,
    total_stars: Option<u32>,
}

impl Settings {
    /// Loads settings from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }

    /// Applies the overrides on top of the provided tuning.
    pub(crate) fn apply(&self, tuning: RoundTuning) -> RoundTuning {
        RoundTuning {
            fade: self.fade_ms.map_or(tuning.fade, Duration::from_millis),
            rest: self.rest_ms.map_or(tuning.rest, Duration::from_millis),
            slowdown_factor: self.slowdown_factor.unwrap_or(tuning.slowdown_factor),
            total_stars: self.total_stars.unwrap_or(tuning.total_stars),
        }
    }
}
