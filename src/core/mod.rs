pub mod config;
pub mod error;
pub mod types;

pub use config::{MembershipConfig, SimulationConfig};
pub use error::{Result, ThermalError};
pub use types::{Action, Term, Tick, FULL_SCALE_ACTION};
