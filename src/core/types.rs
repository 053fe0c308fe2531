//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Control tick counter (simulation time unit)
pub type Tick = u64;

/// Full-scale control action magnitude (°C-equivalent)
///
/// A heater or cooler at full output moves the plant by this much over one
/// skew period.
pub const FULL_SCALE_ACTION: f64 = 3.0;

/// Linguistic term shared by the two input variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Negative,
    Zero,
    Positive,
}

impl Term {
    /// All terms, left to right along the universe
    pub fn all() -> [Term; 3] {
        [Term::Negative, Term::Zero, Term::Positive]
    }

    pub fn index(self) -> usize {
        match self {
            Term::Negative => 0,
            Term::Zero => 1,
            Term::Positive => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Term::Negative => "negative",
            Term::Zero => "zero",
            Term::Positive => "positive",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output set of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Cooler,
    NoChange,
    Heater,
}

impl Action {
    pub fn all() -> [Action; 3] {
        [Action::Cooler, Action::NoChange, Action::Heater]
    }

    pub fn index(self) -> usize {
        match self {
            Action::Cooler => 0,
            Action::NoChange => 1,
            Action::Heater => 2,
        }
    }

    /// Crisp value this set stands for during defuzzification
    pub fn representative(self) -> f64 {
        match self {
            Action::Cooler => -FULL_SCALE_ACTION,
            Action::NoChange => 0.0,
            Action::Heater => FULL_SCALE_ACTION,
        }
    }

    /// Label a crisp action, treating anything inside the deadband as idle
    pub fn classify(cog: f64, deadband: f64) -> Action {
        if cog.abs() < deadband {
            Action::NoChange
        } else if cog > 0.0 {
            Action::Heater
        } else {
            Action::Cooler
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Cooler => "cooler",
            Action::NoChange => "no_change",
            Action::Heater => "heater",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
