//! Rendering for both screens.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, ChartStatus, Screen, TurnPhase};
use crate::chat::Sender;
use crate::energy_data::{ChartSeries, Period};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10)])
        .split(f.area());

    let titles: Vec<Line> = vec![Line::from("Chat"), Line::from("Graphs")];
    let selected = match app.screen {
        Screen::Chat => 0,
        Screen::Graphs => 1,
    };
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Sunergy"))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    match app.screen {
        Screen::Chat => draw_chat(f, app, chunks[1]),
        Screen::Graphs => draw_graphs(f, app, chunks[1]),
    }
}

fn draw_chat(f: &mut Frame, app: &mut App, area: Rect) {
    // Input grows with its content, like the original multi-line composer.
    let input_height = (app.textarea.lines().len() as u16 + 2).clamp(3, 8);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(input_height)])
        .split(area);

    let mut all_lines = Vec::new();
    for message in &app.messages {
        let (name, style) = match message.sender {
            Sender::User => (
                "You",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Sender::Bot => (
                "Sunergy",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        };
        all_lines.push(Line::from(vec![
            Span::styled(name, style),
            Span::raw(": "),
            Span::raw(message.text.as_str()),
        ]));
        all_lines.push(Line::from(""));
    }

    let messages_paragraph = Paragraph::new(all_lines)
        .block(Block::default().borders(Borders::ALL).title("Messages"))
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true })
        .scroll((app.scroll_offset, 0));
    f.render_widget(messages_paragraph, chunks[0]);

    let title = match app.phase {
        TurnPhase::Idle => "Input (Enter to send, Shift+Enter for new line)",
        TurnPhase::AwaitingForecast => "Input (Forecasting...)",
        TurnPhase::AwaitingGeneration => "Input (Generating...)",
    };
    app.textarea
        .set_block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(&app.textarea, chunks[1]);
}

fn draw_graphs(f: &mut Frame, app: &App, area: Rect) {
    match &app.chart.status {
        ChartStatus::Loading => {
            f.render_widget(status_paragraph("Loading energy data...", Color::White), area);
        }
        ChartStatus::Failed => {
            f.render_widget(
                status_paragraph("Failed to load energy data. See sunergy.log.", Color::Red),
                area,
            );
        }
        ChartStatus::Ready(dataset) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(5), Constraint::Length(1)])
                .split(area);

            let series = dataset.series(app.chart.selected);
            if series.is_empty() {
                f.render_widget(
                    status_paragraph("No readings for this period.", Color::DarkGray),
                    chunks[0],
                );
            } else {
                draw_series_chart(f, series, chunks[0]);
            }
            draw_period_selector(f, app.chart.selected, chunks[1]);
        }
    }
}

fn status_paragraph(text: &str, color: Color) -> Paragraph<'_> {
    Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Energy Overview"))
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
}

fn draw_series_chart(f: &mut Frame, series: &ChartSeries, area: Rect) {
    let consumption = finite_points(&series.consumption);
    let generation = finite_points(&series.generation);

    let datasets = vec![
        Dataset::default()
            .name("Consumption")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&consumption),
        Dataset::default()
            .name("Generation")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&generation),
    ];

    let max_x = series.len().saturating_sub(1).max(1) as f64;
    let (min_y, max_y) = value_bounds(&consumption, &generation);

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Energy Overview"))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, max_x])
                .labels(x_axis_labels(&series.labels)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([min_y, max_y])
                .labels(vec![
                    Span::from(format!("{:.0}", min_y)),
                    Span::from(format!("{:.0}", (min_y + max_y) / 2.0)),
                    Span::from(format!("{:.0}", max_y)),
                ]),
        );
    f.render_widget(chart, area);
}

fn finite_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter(|(_, value)| value.is_finite())
        .map(|(index, value)| (index as f64, *value))
        .collect()
}

fn value_bounds(consumption: &[(f64, f64)], generation: &[(f64, f64)]) -> (f64, f64) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (_, value) in consumption.iter().chain(generation.iter()) {
        min_y = min_y.min(*value);
        max_y = max_y.max(*value);
    }
    if !min_y.is_finite() || !max_y.is_finite() {
        return (0.0, 1.0);
    }
    let padding = ((max_y - min_y) * 0.1).max(1.0);
    (min_y - padding, max_y + padding)
}

fn x_axis_labels(labels: &[String]) -> Vec<Span<'_>> {
    match labels.len() {
        0 => Vec::new(),
        1 => vec![Span::raw(labels[0].as_str())],
        2 => vec![
            Span::raw(labels[0].as_str()),
            Span::raw(labels[1].as_str()),
        ],
        n => vec![
            Span::raw(labels[0].as_str()),
            Span::raw(labels[n / 2].as_str()),
            Span::raw(labels[n - 1].as_str()),
        ],
    }
}

fn draw_period_selector(f: &mut Frame, selected: Period, area: Rect) {
    let mut spans = Vec::new();
    for period in Period::ALL {
        let style = if period == selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", period.caption()), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        "(Left/Right or 1-4 to switch)",
        Style::default().fg(Color::DarkGray),
    ));

    let selector = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(selector, area);
}
