//! Terminal session for the live display
//!
//! Owns raw mode and the alternate screen, polls the keyboard between ticks
//! and forwards commands to the driver through its channel.

use crate::core::error::Result;
use crate::simulation::{Driver, LoopCommand};
use crate::ui::display::{draw, OutputSeries};
use crate::ui::input::{InputState, KeyOutcome};
use crate::ui::state::{DisplayState, OUTPUT_SAMPLES};
use crossterm::{
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

/// Restores the terminal when dropped, including on early return
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = self.terminal.backend_mut().execute(LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Queue a command for the next tick; quit is applied at once
fn forward_command(
    driver: &mut Driver,
    commands: &Sender<LoopCommand>,
    state: &mut DisplayState,
    command: LoopCommand,
) {
    if let LoopCommand::Retarget(target) = command {
        state.log(format!("Target set to {:.2}°C", target));
    }
    // The driver owns the receiver, so this cannot fail
    let _ = commands.send(command);
    if command == LoopCommand::Quit {
        driver.drain_commands();
    }
}

/// Run the driver with a live display until quit or `max_ticks`
///
/// Returns the display state so the caller can report the final tick.
pub fn run_interactive(
    mut driver: Driver,
    commands: Sender<LoopCommand>,
    tick_interval: Duration,
    history_len: usize,
    max_ticks: Option<u64>,
) -> Result<DisplayState> {
    let outputs = OutputSeries::sample(driver.control().controller().model());
    let control = driver.control();
    let mut state = DisplayState::new(history_len, control.state().current)
        .with_plant(control.plant().skew_rate(), control.time_step());
    let mut input = InputState::new();
    let mut guard = TerminalGuard::enter()?;

    tracing::info!("Live display started, tick every {:?}", tick_interval);

    let mut last_tick: Option<Instant> = None;
    loop {
        guard.terminal.draw(|f| draw(f, &state, &input, &outputs))?;

        let timeout = last_tick
            .map(|t| tick_interval.saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match input.handle_key(key) {
                    KeyOutcome::Command(command) => {
                        forward_command(&mut driver, &commands, &mut state, command)
                    }
                    KeyOutcome::Rejected(reason) => state.log(reason),
                    KeyOutcome::Edited | KeyOutcome::Ignored => {}
                }
            }
        }

        if driver.is_stopped() {
            break;
        }

        let due = last_tick.map_or(true, |t| t.elapsed() >= tick_interval);
        if !due {
            continue;
        }
        last_tick = Some(Instant::now());

        match driver.tick() {
            Some(snapshot) => {
                let curve = driver
                    .control()
                    .controller()
                    .output_curve(&snapshot.rules, OUTPUT_SAMPLES);
                state.record(snapshot, curve);
            }
            None => break,
        }
        if max_ticks.is_some_and(|max| driver.control().state().tick >= max) {
            break;
        }
    }

    tracing::info!(
        "Live display stopped after {} ticks",
        driver.control().state().tick
    );
    Ok(state)
}
