//! Frame layout for the live display
//!
//! Top: output membership sets, the aggregated output and the COG marker.
//! Middle: recent temperatures against the target. Bottom: status line and
//! the target prompt.

use crate::core::types::{Action, FULL_SCALE_ACTION};
use crate::fuzzy::MembershipModel;
use crate::ui::input::InputState;
use crate::ui::state::{DisplayState, OUTPUT_SAMPLES};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

/// Output set curves, sampled once since the geometry never changes
#[derive(Debug, Clone)]
pub struct OutputSeries {
    pub cooler: Vec<(f64, f64)>,
    pub no_change: Vec<(f64, f64)>,
    pub heater: Vec<(f64, f64)>,
}

impl OutputSeries {
    pub fn sample(model: &MembershipModel) -> Self {
        let points = |action: Action| -> Vec<(f64, f64)> {
            let step = 2.0 * FULL_SCALE_ACTION / (OUTPUT_SAMPLES - 1) as f64;
            (0..OUTPUT_SAMPLES)
                .map(|i| {
                    let x = -FULL_SCALE_ACTION + step * i as f64;
                    (x, model.output_membership(action, x))
                })
                .collect()
        };
        Self {
            cooler: points(Action::Cooler),
            no_change: points(Action::NoChange),
            heater: points(Action::Heater),
        }
    }
}

/// Height of the aggregated curve at `x`, from the nearest sample
pub fn curve_height(curve: &[(f64, f64)], x: f64) -> f64 {
    curve
        .iter()
        .min_by(|a, b| (a.0 - x).abs().total_cmp(&(b.0 - x).abs()))
        .map(|p| p.1)
        .unwrap_or(0.0)
}

pub fn draw(f: &mut Frame, state: &DisplayState, input: &InputState, outputs: &OutputSeries) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.size());

    draw_output_chart(f, chunks[0], state, outputs);
    draw_history_chart(f, chunks[1], state);
    draw_status(f, chunks[2], state, input);

    let help = Paragraph::new(" c: change target | q: quit ")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[3]);
}

fn draw_output_chart(f: &mut Frame, area: Rect, state: &DisplayState, outputs: &OutputSeries) {
    let cog_marker: Vec<(f64, f64)> = state
        .latest
        .map(|s| vec![(s.cog, curve_height(&state.output_curve, s.cog) / 2.0)])
        .unwrap_or_default();

    let datasets = vec![
        Dataset::default()
            .name("Cooler")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&outputs.cooler),
        Dataset::default()
            .name("No Change")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Gray))
            .data(&outputs.no_change),
        Dataset::default()
            .name("Heater")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&outputs.heater),
        Dataset::default()
            .name("Aggregation")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::White))
            .data(&state.output_curve),
        Dataset::default()
            .name("COG")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::LightRed))
            .data(&cog_marker),
    ];

    let title = match state.latest {
        Some(s) => format!(" Target {:.2}°C | Current {:.2}°C ", s.target, s.current),
        None => " Output membership ".to_string(),
    };

    let a = FULL_SCALE_ACTION;
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .title("Action (°C)")
                .bounds([-a, a])
                .labels(vec![
                    Span::raw(format!("{:.0}", -a)),
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", a)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Degree")
                .bounds([0.0, 1.2])
                .labels(vec![Span::raw("0"), Span::raw("1")]),
        );
    f.render_widget(chart, area);
}

fn draw_history_chart(f: &mut Frame, area: Rect, state: &DisplayState) {
    let target = state.latest.map(|s| s.target).unwrap_or_else(|| {
        state.history().back().copied().unwrap_or(0.0)
    });
    let points = state.history_points();
    let last_x = (points.len().max(2) - 1) as f64;
    let target_line = vec![(0.0, target), (last_x, target)];
    let (lo, hi) = state.temperature_bounds(target);

    let datasets = vec![
        Dataset::default()
            .name("Target")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&target_line),
        Dataset::default()
            .name("Temperature")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(state.history_title()))
        .x_axis(
            Axis::default()
                .title("Time steps")
                .bounds([0.0, last_x]),
        )
        .y_axis(
            Axis::default()
                .title("°C")
                .bounds([lo, hi])
                .labels(vec![
                    Span::raw(format!("{:.1}", lo)),
                    Span::raw(format!("{:.1}", hi)),
                ]),
        );
    f.render_widget(chart, area);
}

fn draw_status(f: &mut Frame, area: Rect, state: &DisplayState, input: &InputState) {
    let line = if let Some(prompt) = input.prompt() {
        Line::from(vec![
            Span::styled(
                "New target (°C): ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(prompt.to_string(), Style::default().fg(Color::Yellow)),
        ])
    } else {
        let text = state
            .latest
            .map(|s| s.to_string())
            .unwrap_or_else(|| "Waiting for first tick...".to_string());
        let colour = match state.latest.map(|s| s.action) {
            Some(Action::Heater) => Color::Red,
            Some(Action::Cooler) => Color::Blue,
            _ => Color::Green,
        };
        Line::from(Span::styled(text, Style::default().fg(colour)))
    };

    let title = state
        .log
        .back()
        .map(|m| format!(" {} ", m))
        .unwrap_or_else(|| " Status ".to_string());
    let status = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(status, area);
}
