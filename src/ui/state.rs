//! UI state management for the live display

use crate::simulation::Snapshot;
use std::collections::VecDeque;

/// Maximum status log entries to keep
const MAX_LOG_ENTRIES: usize = 20;

/// Samples used when plotting output membership curves
pub const OUTPUT_SAMPLES: usize = 121;

/// Everything the display needs between frames
#[derive(Debug, Clone)]
pub struct DisplayState {
    /// Most recent temperatures, oldest first
    history: VecDeque<f64>,
    capacity: usize,
    /// Latest tick, if any has run
    pub latest: Option<Snapshot>,
    /// Aggregated output curve of the latest tick
    pub output_curve: Vec<(f64, f64)>,
    /// Status messages
    pub log: VecDeque<String>,
    /// Plant skew rate and tick length, shown in the history title
    plant: Option<(f64, f64)>,
}

impl DisplayState {
    /// Create a state whose history is pre-filled with `initial_temperature`
    pub fn new(capacity: usize, initial_temperature: f64) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: std::iter::repeat(initial_temperature).take(capacity).collect(),
            capacity,
            latest: None,
            output_curve: Vec::new(),
            log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            plant: None,
        }
    }

    pub fn with_plant(mut self, skew_rate: f64, time_step: f64) -> Self {
        self.plant = Some((skew_rate, time_step));
        self
    }

    /// Title of the temperature history chart
    pub fn history_title(&self) -> String {
        match self.plant {
            Some((skew, dt)) => format!(
                " Environment temperature | skew {:.2}s | dt {:.2}s ",
                skew, dt
            ),
            None => " Environment temperature ".to_string(),
        }
    }

    /// Record a tick and the curve computed for it
    pub fn record(&mut self, snapshot: Snapshot, output_curve: Vec<(f64, f64)>) {
        if self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(snapshot.current);
        self.latest = Some(snapshot);
        self.output_curve = output_curve;
    }

    /// Add a status message
    pub fn log(&mut self, message: impl Into<String>) {
        if self.log.len() >= MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
        self.log.push_back(message.into());
    }

    pub fn history(&self) -> &VecDeque<f64> {
        &self.history
    }

    /// History as `(index, temperature)` points for plotting
    pub fn history_points(&self) -> Vec<(f64, f64)> {
        self.history
            .iter()
            .enumerate()
            .map(|(i, &t)| (i as f64, t))
            .collect()
    }

    /// Temperature bounds covering the history and `target`, padded by 1°C
    pub fn temperature_bounds(&self, target: f64) -> (f64, f64) {
        let (lo, hi) = self
            .history
            .iter()
            .fold((target, target), |(lo, hi), &t| (lo.min(t), hi.max(t)));
        (lo - 1.0, hi + 1.0)
    }
}
