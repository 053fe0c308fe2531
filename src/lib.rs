//! Fuzzy Thermal - closed-loop fuzzy temperature control simulation

pub mod core;
pub mod fuzzy;
pub mod simulation;
pub mod ui;
