//! Simulated thermal plant
//!
//! The plant integrates the crisp action at a rate set by the skew rate: a
//! full-scale action of ±A moves the temperature by ±A over `skew_rate`
//! seconds. There is no ambient loss and no noise.

use crate::core::error::{Result, ThermalError};
use crate::core::types::FULL_SCALE_ACTION;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plant {
    skew_rate: f64,
}

impl Plant {
    pub fn new(skew_rate: f64) -> Result<Self> {
        if !(skew_rate.is_finite() && skew_rate > 0.0) {
            return Err(ThermalError::InvalidConfig(format!(
                "skew_rate must be finite and > 0, got {}",
                skew_rate
            )));
        }
        Ok(Self { skew_rate })
    }

    pub fn skew_rate(&self) -> f64 {
        self.skew_rate
    }

    /// Largest temperature change one tick of `dt` seconds may produce
    pub fn max_step(&self, dt: f64) -> f64 {
        FULL_SCALE_ACTION * dt / self.skew_rate
    }

    /// Temperature change produced by `action` over `dt` seconds
    ///
    /// The action is clamped to full scale, then the delta to `max_step`.
    pub fn delta(&self, action: f64, dt: f64) -> f64 {
        let action = action.clamp(-FULL_SCALE_ACTION, FULL_SCALE_ACTION);
        let limit = self.max_step(dt);
        (action / self.skew_rate * dt).clamp(-limit, limit)
    }

    /// Temperature after applying `action` for `dt` seconds
    pub fn apply(&self, current: f64, action: f64, dt: f64) -> f64 {
        current + self.delta(action, dt)
    }
}
