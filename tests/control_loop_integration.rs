//! Integration tests for the closed control loop
//!
//! These tests drive the controller and the plant together:
//! - Start-up scenarios from a cold or on-target plant
//! - Settling toward the target from either side
//! - Retargeting through the command channel between ticks
//! - Configuration errors surfacing before any tick runs

use fuzzy_thermal::core::config::SimulationConfig;
use fuzzy_thermal::core::error::ThermalError;
use fuzzy_thermal::core::types::Action;
use fuzzy_thermal::simulation::{ControlLoop, ControlState, Driver, LoopCommand};

fn cold_start() -> SimulationConfig {
    SimulationConfig::new(30.0)
        .with_initial_temperature(20.0)
        .with_skew_rate(2.0)
        .with_time_step(1.0)
}

// ============================================================================
// Start-up Scenarios
// ============================================================================

#[test]
fn test_cold_start_first_tick() {
    let mut control = ControlLoop::new(&cold_start()).unwrap();
    let snap = control.step();

    assert_eq!(snap.error, -10.0);
    assert_eq!(snap.error_dot, 0.0);
    assert!((snap.cog - 3.0).abs() < 1e-9, "cog was {}", snap.cog);
    assert_eq!(snap.action, Action::Heater);
    assert!((snap.current - 21.5).abs() < 1e-9);
    assert_eq!(snap.time, 1.0);
}

#[test]
fn test_on_target_stays_put() {
    let config = SimulationConfig::new(30.0).with_initial_temperature(30.0);
    let state = ControlState::new(30.0, 30.0).with_previous_error(0.0);
    let mut control = ControlLoop::with_state(&config, state).unwrap();

    let snap = control.step();
    assert_eq!(snap.error, 0.0);
    assert_eq!(snap.error_dot, 0.0);
    assert!(snap.cog.abs() < 1e-9);
    assert!((snap.current - 30.0).abs() < 1e-9);
}

#[test]
fn test_default_initial_temperature_is_zero() {
    let mut control = ControlLoop::new(&SimulationConfig::new(5.0)).unwrap();
    assert_eq!(control.state().current, 0.0);
    let snap = control.step();
    assert_eq!(snap.error, -5.0);
    assert_eq!(snap.action, Action::Heater);
}

#[test]
fn test_zero_skew_is_configuration_error() {
    let config = cold_start().with_skew_rate(0.0);
    match ControlLoop::new(&config) {
        Err(ThermalError::InvalidConfig(msg)) => assert!(msg.contains("skew_rate")),
        other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
    }
}

// ============================================================================
// Settling Behaviour
// ============================================================================

#[test]
fn test_heats_up_and_settles() {
    let mut control = ControlLoop::new(&cold_start()).unwrap();
    let snapshots = control.run(40);

    // Full heat until the error enters the zero set
    for snap in &snapshots[..5] {
        assert_eq!(snap.action, Action::Heater);
    }

    let last = snapshots.last().unwrap();
    assert!(
        (last.current - 30.0).abs() < 0.1,
        "did not settle: {:.3}°C after 40 ticks",
        last.current
    );
}

#[test]
fn test_cools_down_and_settles() {
    let config = SimulationConfig::new(25.0).with_initial_temperature(40.0);
    let mut control = ControlLoop::new(&config).unwrap();
    let snapshots = control.run(40);

    assert_eq!(snapshots[0].action, Action::Cooler);
    assert!((snapshots[0].current - 38.5).abs() < 1e-9);
    assert!((control.state().current - 25.0).abs() < 0.1);
}

#[test]
fn test_settles_with_finer_time_step() {
    let config = cold_start().with_time_step(0.5);
    let mut control = ControlLoop::new(&config).unwrap();
    control.run(80);
    assert!((control.state().current - 30.0).abs() < 0.1);
    assert!((control.state().elapsed - 40.0).abs() < 1e-9);
}

#[test]
fn test_every_tick_respects_rate_limit() {
    let config = cold_start().with_skew_rate(3.0).with_time_step(0.25);
    let mut control = ControlLoop::new(&config).unwrap();
    let limit = 3.0 * 0.25 / 3.0;

    let mut previous = control.state().current;
    for snap in control.run(100) {
        assert!((snap.current - previous).abs() <= limit + 1e-12);
        assert!(snap.cog.abs() <= 3.0);
        previous = snap.current;
    }
}

// ============================================================================
// Retargeting
// ============================================================================

#[test]
fn test_retarget_mid_run() {
    let (mut driver, commands) = Driver::new(ControlLoop::new(&cold_start()).unwrap());

    for _ in 0..40 {
        driver.tick().unwrap();
    }
    let elapsed = driver.control().state().elapsed;

    commands.send(LoopCommand::Retarget(20.0)).unwrap();
    let snap = driver.tick().unwrap();

    assert_eq!(snap.target, 20.0);
    assert!((snap.time - (elapsed + 1.0)).abs() < 1e-9);
    // The jump in error shows up as a derivative on the first tick
    assert!(snap.error > 9.0);
    assert!(snap.error_dot > 9.0);

    for _ in 0..60 {
        driver.tick().unwrap();
    }
    assert!((driver.control().state().current - 20.0).abs() < 0.1);
}

#[test]
fn test_quit_command_stops_driver() {
    let (mut driver, commands) = Driver::new(ControlLoop::new(&cold_start()).unwrap());
    driver.tick();
    driver.tick();
    commands.send(LoopCommand::Quit).unwrap();

    assert!(driver.tick().is_none());
    assert_eq!(driver.control().state().tick, 2);
}

#[test]
fn test_independent_loops_do_not_share_state() {
    let mut a = ControlLoop::new(&cold_start()).unwrap();
    let mut b = ControlLoop::new(&cold_start()).unwrap();

    a.run(5);
    b.set_target(0.0);
    b.run(1);

    assert_eq!(a.state().tick, 5);
    assert_eq!(b.state().tick, 1);
    assert_eq!(a.state().target, 30.0);
    assert!(b.state().current < 20.0);
}
