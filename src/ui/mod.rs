//! UI module - ratatui live display for the control loop

pub mod display;
pub mod input;
pub mod state;
pub mod terminal;

pub use display::OutputSeries;
pub use input::{InputMode, InputState, KeyOutcome};
pub use state::DisplayState;
pub use terminal::run_interactive;
