//! Simulation configuration with documented constants
//!
//! Every tunable of the controller and the plant lives here, including the
//! membership breakpoints, so nothing in the inference path is a hidden
//! constant.

use crate::core::error::{Result, ThermalError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Geometry of the input membership functions
///
/// Each input variable uses a left shoulder, a triangle and a right shoulder
/// sharing one spread `D`: Negative is 1 at or below `-D` and reaches 0 at
/// the origin, Zero is the triangle `(-D, 0, D)`, Positive mirrors Negative.
/// Adjacent sets cross at `±D/2` with degree 0.5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MembershipConfig {
    /// Spread of the error sets (°C)
    ///
    /// Smaller spreads make the controller treat small deviations as fully
    /// "cold" or "hot" and react at full scale sooner.
    pub error_spread: f64,

    /// Spread of the error-dot sets (°C/s)
    pub error_dot_spread: f64,

    /// Inputs are clipped to `±working_range` before fuzzification
    pub working_range: f64,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            error_spread: 2.0,
            error_dot_spread: 5.0,
            working_range: 100.0,
        }
    }
}

/// Configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Temperature the controller drives toward (°C)
    pub target: f64,

    /// Plant temperature at tick zero (°C)
    #[serde(default)]
    pub initial_temperature: f64,

    /// Seconds the plant needs to realise a full-scale action
    ///
    /// One tick moves the plant by up to `3 * time_step / skew_rate`. With the
    /// standard rule table, steps much larger than the error-dot spread make
    /// positive error-dot keep calling for heat and the loop runs away.
    #[serde(default = "default_skew_rate")]
    pub skew_rate: f64,

    /// Duration of one control tick (s)
    #[serde(default = "default_time_step")]
    pub time_step: f64,

    /// Band around zero inside which the action is labelled `no_change`
    ///
    /// Display only. The plant always receives the continuous action.
    #[serde(default = "default_output_deadband")]
    pub output_deadband: f64,

    /// Number of temperature samples kept for the history plot
    #[serde(default = "default_history_len")]
    pub history_len: usize,

    #[serde(default)]
    pub membership: MembershipConfig,
}

fn default_skew_rate() -> f64 {
    2.0
}

fn default_time_step() -> f64 {
    1.0
}

fn default_output_deadband() -> f64 {
    0.01
}

fn default_history_len() -> usize {
    50
}

impl SimulationConfig {
    /// Create a config for `target` with every other field at its default
    pub fn new(target: f64) -> Self {
        Self {
            target,
            initial_temperature: 0.0,
            skew_rate: default_skew_rate(),
            time_step: default_time_step(),
            output_deadband: default_output_deadband(),
            history_len: default_history_len(),
            membership: MembershipConfig::default(),
        }
    }

    pub fn with_initial_temperature(mut self, initial: f64) -> Self {
        self.initial_temperature = initial;
        self
    }

    pub fn with_skew_rate(mut self, skew_rate: f64) -> Self {
        self.skew_rate = skew_rate;
        self
    }

    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("target", self.target),
            ("initial_temperature", self.initial_temperature),
            ("skew_rate", self.skew_rate),
            ("time_step", self.time_step),
            ("output_deadband", self.output_deadband),
        ] {
            if !value.is_finite() {
                return Err(ThermalError::InvalidConfig(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }

        if self.skew_rate <= 0.0 {
            return Err(ThermalError::InvalidConfig(format!(
                "skew_rate must be > 0, got {}",
                self.skew_rate
            )));
        }

        if self.time_step <= 0.0 {
            return Err(ThermalError::InvalidConfig(format!(
                "time_step must be > 0, got {}",
                self.time_step
            )));
        }

        if self.output_deadband < 0.0 {
            return Err(ThermalError::InvalidConfig(format!(
                "output_deadband must be >= 0, got {}",
                self.output_deadband
            )));
        }

        if self.history_len == 0 {
            return Err(ThermalError::InvalidConfig(
                "history_len must be at least 1".into(),
            ));
        }

        let m = &self.membership;
        for (name, value) in [
            ("membership.error_spread", m.error_spread),
            ("membership.error_dot_spread", m.error_dot_spread),
            ("membership.working_range", m.working_range),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ThermalError::InvalidConfig(format!(
                    "{} must be finite and > 0, got {}",
                    name, value
                )));
            }
        }

        // Clipping inside a spread would hide the shoulders' saturation
        if m.working_range < m.error_spread || m.working_range < m.error_dot_spread {
            return Err(ThermalError::InvalidConfig(format!(
                "membership.working_range ({}) must cover both spreads ({}, {})",
                m.working_range, m.error_spread, m.error_dot_spread
            )));
        }

        Ok(())
    }
}
