//! Discrete-time control loop
//!
//! Each tick computes the error and its finite-difference derivative, asks the
//! fuzzy controller for an action, lets the plant integrate it, and returns a
//! [`Snapshot`] of what happened.

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{Action, Tick};
use crate::fuzzy::{FuzzyController, RuleOutput};
use crate::simulation::plant::Plant;
use serde::Serialize;
use std::fmt;

/// Mutable state of one simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlState {
    /// Setpoint (°C)
    pub target: f64,
    /// Plant temperature (°C)
    pub current: f64,
    /// Error seen on the previous tick, `None` before the first tick
    pub previous_error: Option<f64>,
    /// Simulated seconds since start
    pub elapsed: f64,
    pub tick: Tick,
}

impl ControlState {
    pub fn new(target: f64, current: f64) -> Self {
        Self {
            target,
            current,
            previous_error: None,
            elapsed: 0.0,
            tick: 0,
        }
    }

    pub fn with_previous_error(mut self, previous_error: f64) -> Self {
        self.previous_error = Some(previous_error);
        self
    }

    /// Signed distance from the setpoint, positive when too hot
    pub fn error(&self) -> f64 {
        self.current - self.target
    }
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: Tick,
    /// Elapsed seconds at the end of the tick
    pub time: f64,
    pub target: f64,
    /// Temperature after the plant update
    pub current: f64,
    /// Error before the plant update
    pub error: f64,
    pub error_dot: f64,
    pub action: Action,
    /// Crisp controller output
    pub cog: f64,
    /// No rule fired on this tick
    pub degenerate: bool,
    pub rules: [RuleOutput; 9],
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Target: {:.2}°C | Current: {:.2}°C | Error: {:.2} | Error-dot: {:.2} | Action: {}",
            self.target, self.current, self.error, self.error_dot, self.action
        )
    }
}

/// Owns the controller, the plant and the state, and advances them together
#[derive(Debug, Clone)]
pub struct ControlLoop {
    controller: FuzzyController,
    plant: Plant,
    time_step: f64,
    output_deadband: f64,
    state: ControlState,
}

impl ControlLoop {
    /// Validate `config` and build a loop starting at its initial temperature
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        let state = ControlState::new(config.target, config.initial_temperature);
        Self::with_state(config, state)
    }

    /// Build a loop that resumes from an existing state
    ///
    /// Only the tuning fields of `config` are used; target and temperature
    /// come from `state`.
    pub fn with_state(config: &SimulationConfig, state: ControlState) -> Result<Self> {
        config.validate()?;
        let controller = FuzzyController::from_config(&config.membership)?;
        let plant = Plant::new(config.skew_rate)?;

        tracing::debug!(
            "Control loop ready: target {:.2}°C, current {:.2}°C, skew {}s, dt {}s",
            state.target,
            state.current,
            config.skew_rate,
            config.time_step
        );

        Ok(Self {
            controller,
            plant,
            time_step: config.time_step,
            output_deadband: config.output_deadband,
            state,
        })
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn controller(&self) -> &FuzzyController {
        &self.controller
    }

    pub fn plant(&self) -> &Plant {
        &self.plant
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Replace the setpoint between ticks
    ///
    /// Previous error and elapsed time are kept, so the next tick sees the
    /// jump in error as a derivative. Non-finite targets are ignored.
    pub fn set_target(&mut self, target: f64) {
        if !target.is_finite() {
            tracing::warn!("Ignoring non-finite target {}", target);
            return;
        }
        tracing::info!(
            "Target changed from {:.2}°C to {:.2}°C at tick {}",
            self.state.target,
            target,
            self.state.tick
        );
        self.state.target = target;
    }

    /// Advance the simulation by one tick
    pub fn step(&mut self) -> Snapshot {
        let dt = self.time_step;
        let error = self.state.error();
        let previous_error = self.state.previous_error.unwrap_or(error);
        let error_dot = (error - previous_error) / dt;

        let inference = self.controller.evaluate(error, error_dot);
        let current = self.plant.apply(self.state.current, inference.action, dt);

        self.state.current = current;
        self.state.previous_error = Some(error);
        self.state.elapsed += dt;
        self.state.tick += 1;

        let snapshot = Snapshot {
            tick: self.state.tick,
            time: self.state.elapsed,
            target: self.state.target,
            current,
            error,
            error_dot,
            action: Action::classify(inference.action, self.output_deadband),
            cog: inference.action,
            degenerate: inference.degenerate,
            rules: inference.rules,
        };

        tracing::debug!(
            tick = snapshot.tick,
            error = snapshot.error,
            error_dot = snapshot.error_dot,
            cog = snapshot.cog,
            current = snapshot.current,
            "control tick"
        );

        snapshot
    }

    /// Run `ticks` ticks and collect their snapshots
    pub fn run(&mut self, ticks: usize) -> Vec<Snapshot> {
        (0..ticks).map(|_| self.step()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ThermalError;

    fn config(target: f64, initial: f64) -> SimulationConfig {
        SimulationConfig::new(target).with_initial_temperature(initial)
    }

    #[test]
    fn test_first_tick_heats_cold_plant() {
        let mut control = ControlLoop::new(&config(30.0, 20.0)).unwrap();
        let snap = control.step();

        assert_eq!(snap.tick, 1);
        assert_eq!(snap.time, 1.0);
        assert_eq!(snap.error, -10.0);
        assert_eq!(snap.error_dot, 0.0);
        assert!((snap.cog - 3.0).abs() < 1e-9);
        assert_eq!(snap.action, Action::Heater);
        assert!((snap.current - 21.5).abs() < 1e-9);
    }

    #[test]
    fn test_previous_error_is_pre_update_error() {
        let mut control = ControlLoop::new(&config(30.0, 20.0)).unwrap();
        control.step();
        assert_eq!(control.state().previous_error, Some(-10.0));

        let snap = control.step();
        assert!((snap.error - (-8.5)).abs() < 1e-9);
        assert!((snap.error_dot - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_on_target_holds() {
        let state = ControlState::new(30.0, 30.0).with_previous_error(0.0);
        let mut control = ControlLoop::with_state(&config(30.0, 30.0), state).unwrap();
        for _ in 0..10 {
            let snap = control.step();
            assert!(snap.cog.abs() < 1e-9);
            assert_eq!(snap.action, Action::NoChange);
        }
        assert!((control.state().current - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_skew_fails_before_ticking() {
        let result = ControlLoop::new(&config(30.0, 20.0).with_skew_rate(0.0));
        assert!(matches!(result, Err(ThermalError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_time_step_rejected() {
        let result = ControlLoop::new(&config(30.0, 20.0).with_time_step(0.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_retarget_keeps_history() {
        let mut control = ControlLoop::new(&config(30.0, 20.0)).unwrap();
        control.run(3);
        let elapsed = control.state().elapsed;
        let previous = control.state().previous_error;

        control.set_target(10.0);
        assert_eq!(control.state().elapsed, elapsed);
        assert_eq!(control.state().previous_error, previous);

        let snap = control.step();
        assert_eq!(snap.target, 10.0);
        assert!(snap.error > 0.0);
    }

    #[test]
    fn test_non_finite_target_ignored() {
        let mut control = ControlLoop::new(&config(30.0, 20.0)).unwrap();
        control.set_target(f64::NAN);
        assert_eq!(control.state().target, 30.0);
    }

    #[test]
    fn test_snapshot_text_format() {
        let mut control = ControlLoop::new(&config(30.0, 20.0)).unwrap();
        let line = control.step().to_string();
        assert_eq!(
            line,
            "Target: 30.00°C | Current: 21.50°C | Error: -10.00 | Error-dot: 0.00 | Action: heater"
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut control = ControlLoop::new(&config(30.0, 20.0)).unwrap();
        let json = serde_json::to_value(control.step()).unwrap();
        assert_eq!(json["action"], "heater");
        assert_eq!(json["rules"].as_array().map(|r| r.len()), Some(9));
    }
}
