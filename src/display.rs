//! Terminal UI display using ratatui.

use crate::figure::{tick_labels, Figure, Panel};
use crate::plot;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Line,
    widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

/// How long a status message stays in the help bar
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Input poll interval; also bounds how late a status message is cleared
const TICK: Duration = Duration::from_millis(250);

/// Open the figure in the terminal and block until the user closes it.
///
/// Pressing `s` writes the figure to `save_path` as SVG.
pub fn show(figure: &Figure, save_path: &Path, svg_size: (u32, u32)) -> Result<()> {
    // Log lines would tear the alternate screen
    let log_level = log::max_level();
    log::set_max_level(log::LevelFilter::Off);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, figure, save_path, svg_size);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    log::set_max_level(log_level);

    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    figure: &Figure,
    save_path: &Path,
    svg_size: (u32, u32),
) -> Result<()> {
    let mut status: Option<(String, Instant)> = None;

    loop {
        let message = status
            .as_ref()
            .filter(|(_, at)| at.elapsed() < STATUS_TTL)
            .map(|(msg, _)| msg.as_str());

        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(6), Constraint::Length(1)])
                .split(f.area());

            render_figure(f, chunks[0], figure);
            render_help_bar(f, chunks[1], message);
        })?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match handle_key(key.code, figure, save_path, svg_size) {
                KeyAction::Quit => break,
                KeyAction::Status(msg) => status = Some((msg, Instant::now())),
                KeyAction::None => {}
            }
        }
    }

    Ok(())
}

/// Outcome of a key press in the viewer
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Quit,
    /// Show a message in the help bar
    Status(String),
    None,
}

/// Map a key press to an action, performing the save on `s`
pub fn handle_key(code: KeyCode, figure: &Figure, save_path: &Path, svg_size: (u32, u32)) -> KeyAction {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('s') => match plot::save_svg(figure, save_path, svg_size) {
            Ok(()) => KeyAction::Status(format!("Saved {}", save_path.display())),
            Err(e) => KeyAction::Status(format!("Save failed: {:#}", e)),
        },
        _ => KeyAction::None,
    }
}

/// Render all panels stacked top to bottom with no gaps between them
pub fn render_figure(f: &mut Frame, area: Rect, figure: &Figure) {
    let count = figure.panels.len().max(1) as u32;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(figure.panels.iter().map(|_| Constraint::Ratio(1, count)))
        .split(area);

    for (panel, row) in figure.panels.iter().zip(rows.iter()) {
        render_panel(f, *row, panel);
    }
}

fn render_panel(f: &mut Frame, area: Rect, panel: &Panel) {
    let block = Block::default()
        .title(Line::from(panel.label))
        .title_alignment(Alignment::Center)
        .title_style(Style::default().add_modifier(Modifier::BOLD));

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&panel.points);

    let mut x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([panel.x_bounds.0, panel.x_bounds.1]);
    // ticks are evenly spaced from bound to bound, matching how the chart places labels
    if let Some(ticks) = &panel.x_ticks {
        x_axis = x_axis.labels(tick_labels(ticks));
    }

    let y_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([panel.y_bounds.0, panel.y_bounds.1])
        .labels(axis_labels(panel.y_bounds, 2));

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis);

    f.render_widget(chart, area);
}

/// Evenly spaced labels from the lower to the upper bound
pub fn axis_labels(bounds: (f64, f64), count: usize) -> Vec<String> {
    let (lo, hi) = bounds;
    let count = count.max(2);
    let span = hi - lo;
    let decimals = if span >= 10.0 {
        0
    } else if span >= 1.0 {
        1
    } else {
        2
    };
    (0..count)
        .map(|i| lo + span * i as f64 / (count - 1) as f64)
        .map(|v| format!("{:.*}", decimals, v))
        .collect()
}

/// Render help bar at the bottom
pub fn render_help_bar(f: &mut Frame, area: Rect, status: Option<&str>) {
    let (text, style) = match status {
        Some(msg) => (
            format!(" {} ", msg),
            Style::default().fg(Color::White).bg(Color::Blue),
        ),
        None => (
            " q: Quit | s: Save SVG ".to_string(),
            Style::default().fg(Color::Black).bg(Color::Gray),
        ),
    };

    let paragraph = Paragraph::new(text).style(style);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::PANELS;
    use crate::sample::SimulationSamples;
    use ratatui::backend::TestBackend;

    fn example() -> Figure {
        let mut samples = SimulationSamples::new();
        samples.push_row([0.0, 1.0, 1.0, 5.0, 5.0, 5.0, 0.0, 0.0, 1.2, 0.5, 0.1]);
        samples.push_row([1.0, 2.0, 1.0, 6.0, 5.0, 5.0, 1.0, 0.0, 1.4, 0.6, 0.15]);
        Figure::from_samples(&samples)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn every_panel_label_is_drawn_in_order() {
        let mut terminal = Terminal::new(TestBackend::new(100, 60)).unwrap();
        let figure = example();
        terminal
            .draw(|f| {
                let area = f.area();
                render_figure(f, area, &figure)
            })
            .unwrap();

        let text = screen_text(&terminal);
        let positions: Vec<usize> = PANELS
            .iter()
            .map(|spec| text.find(spec.label).unwrap_or_else(|| panic!("missing {}", spec.label)))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn help_bar_shows_status_when_present() {
        let mut terminal = Terminal::new(TestBackend::new(60, 1)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render_help_bar(f, area, Some("Saved sim.svg"))
            })
            .unwrap();
        assert!(screen_text(&terminal).contains("Saved sim.svg"));

        terminal
            .draw(|f| {
                let area = f.area();
                render_help_bar(f, area, None)
            })
            .unwrap();
        assert!(screen_text(&terminal).contains("q: Quit"));
    }

    #[test]
    fn empty_figure_renders() {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        let figure = Figure::from_samples(&SimulationSamples::new());
        terminal
            .draw(|f| {
                let area = f.area();
                render_figure(f, area, &figure)
            })
            .unwrap();
        assert!(screen_text(&terminal).contains("rejected"));
    }

    #[test]
    fn axis_labels_span_bounds() {
        assert_eq!(
            axis_labels((0.0, 1.0), 6),
            vec!["0.0", "0.2", "0.4", "0.6", "0.8", "1.0"]
        );
        assert_eq!(axis_labels((0.0, 0.05), 2), vec!["0.00", "0.05"]);
        assert_eq!(axis_labels((0.0, 250.0), 3), vec!["0", "125", "250"]);
    }

    #[test]
    fn bottom_axis_shows_tick_values() {
        let mut samples = SimulationSamples::new();
        samples.push_row([3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        samples.push_row([17.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let figure = Figure::from_samples(&samples);

        let mut terminal = Terminal::new(TestBackend::new(100, 60)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render_figure(f, area, &figure)
            })
            .unwrap();

        let text = screen_text(&terminal);
        let bottom = text.lines().last().unwrap();
        for label in ["5", "10", "15", "20"] {
            assert!(bottom.contains(label), "missing tick {label} in {bottom:?}");
        }
        assert!(!text.contains("17"));
    }

    #[test]
    fn quit_keys() {
        let figure = example();
        let path = Path::new("unused.svg");
        assert_eq!(handle_key(KeyCode::Char('q'), &figure, path, (100, 100)), KeyAction::Quit);
        assert_eq!(handle_key(KeyCode::Esc, &figure, path, (100, 100)), KeyAction::Quit);
        assert_eq!(handle_key(KeyCode::Char('x'), &figure, path, (100, 100)), KeyAction::None);
        assert!(!path.exists());
    }

    #[test]
    fn save_key_writes_svg_and_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.svg");

        let action = handle_key(KeyCode::Char('s'), &example(), &path, (600, 700));

        assert_eq!(action, KeyAction::Status(format!("Saved {}", path.display())));
        assert!(path.exists());
    }

    #[test]
    fn save_failure_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let path = blocker.join("saved.svg");

        match handle_key(KeyCode::Char('s'), &example(), &path, (600, 700)) {
            KeyAction::Status(msg) => assert!(msg.starts_with("Save failed"), "{msg}"),
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
