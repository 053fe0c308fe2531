//! Simulation systems: plant, control loop and the command-driven driver

pub mod command;
pub mod control_loop;
pub mod plant;

pub use command::{parse_command, parse_target, Driver, LoopCommand};
pub use control_loop::{ControlLoop, ControlState, Snapshot};
pub use plant::Plant;
