use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table};
use ratatui::Frame;
use tidewatch_core::{Agent, Connectivity};
use tidewatch_derive::{alert_headline, describe, summarize_payload};

use super::app::{App, Panel, AGENT_LOG_ROWS, ALERT_CHIPS, INJECTION_ROWS, TANK_ROWS};
use crate::fmt::{event_clock, injection_cells, tank_cells, truncate_str};

/// Render the full TUI frame.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(8),    // panels
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_stream(f, app, top[0]);
    render_tanks(f, app, top[1]);
    render_injections(f, app, bottom[0]);
    render_agents(f, app, bottom[1]);

    render_status_bar(f, app, chunks[2]);
}

fn panel_block(app: &App, panel: Panel, title: String) -> Block<'static> {
    let style = if app.active_panel == panel {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style)
}

fn agent_color(agent: Agent) -> Color {
    match agent {
        Agent::Sentinel => Color::Yellow,
        Agent::Compressor => Color::Blue,
        Agent::Hauler => Color::Magenta,
        Agent::Geologist => Color::Green,
        Agent::Guardian => Color::Red,
        Agent::System => Color::Gray,
    }
}

fn empty_panel(f: &mut Frame, block: Block<'static>, area: Rect, msg: &'static str) {
    let p = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    f.render_widget(p, area);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let status = app.snapshot.connectivity;
    let (dot, color) = match status {
        Connectivity::Online => ("●", Color::Green),
        Connectivity::Offline => ("○", Color::Red),
    };
    let line = Line::from(vec![
        Span::styled(
            " TIDEWATCH ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{dot} {}", status.label()), Style::default().fg(color)),
        Span::styled(
            format!("  {}", app.endpoint),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_stream(f: &mut Frame, app: &App, area: Rect) {
    let recent = &app.snapshot.recent;
    let block = panel_block(app, Panel::Stream, format!(" Event Stream ({}) ", recent.len()));
    if recent.is_empty() {
        empty_panel(f, block, area, "Waiting for events");
        return;
    }

    let width = area.width.saturating_sub(24) as usize;
    let items: Vec<ListItem> = recent
        .iter()
        .skip(app.stream_scroll)
        .map(|ev| {
            let agent = ev.kind.agent();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", event_clock(ev)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<20} ", ev.kind.as_str()),
                    Style::default().fg(agent_color(agent)),
                ),
                Span::raw(truncate_str(&summarize_payload(ev), width)),
            ]))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn render_tanks(f: &mut Frame, app: &App, area: Rect) {
    let tanks = &app.snapshot.tanks;
    let block = panel_block(app, Panel::Tanks, format!(" Tank Movements ({}) ", tanks.len()));
    if tanks.is_empty() {
        empty_panel(f, block, area, "No tanks yet");
        return;
    }

    let rows: Vec<Row> = tanks
        .iter()
        .take(TANK_ROWS)
        .skip(app.tank_scroll)
        .map(|t| {
            let [id, origin, mass, pressure, sealed] = tank_cells(t);
            let sealed_style = if t.sealed == Some(true) {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Yellow)
            };
            Row::new(vec![
                Cell::from(id),
                Cell::from(origin),
                Cell::from(mass),
                Cell::from(pressure),
                Cell::from(sealed).style(sealed_style),
            ])
        })
        .collect();
    let header = Row::new(["Tank", "Origin", "kg CO2", "psi", "State"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Length(12),
        Constraint::Min(10),
        Constraint::Length(9),
        Constraint::Length(7),
        Constraint::Length(7),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn render_injections(f: &mut Frame, app: &App, area: Rect) {
    let injections = &app.snapshot.injections;
    let block = panel_block(
        app,
        Panel::Injections,
        format!(" Injection Wells ({}) ", injections.len()),
    );
    if injections.is_empty() {
        empty_panel(f, block, area, "No injections yet");
        return;
    }

    let rows: Vec<Row> = injections
        .iter()
        .take(INJECTION_ROWS)
        .skip(app.injection_scroll)
        .map(|r| Row::new(injection_cells(r)))
        .collect();
    let header = Row::new(["Well", "Tank", "Status", "t CO2"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Min(10),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn render_agents(f: &mut Frame, app: &App, area: Rect) {
    let snap = &app.snapshot;
    let block = panel_block(app, Panel::Agents, format!(" Agent Logs ({}) ", snap.alerts.len()));
    if snap.recent.is_empty() {
        empty_panel(f, block, area, "No agent activity");
        return;
    }

    let width = area.width.saturating_sub(16) as usize;
    let mut items: Vec<ListItem> = snap
        .alerts
        .iter()
        .take(ALERT_CHIPS)
        .map(|a| {
            ListItem::new(Line::from(Span::styled(
                format!(" ! {}", truncate_str(&alert_headline(a), width)),
                Style::default().fg(Color::White).bg(Color::Red),
            )))
        })
        .collect();

    items.extend(
        snap.recent
            .iter()
            .take(AGENT_LOG_ROWS)
            .skip(app.agent_scroll)
            .map(|ev| {
                let line = describe(ev);
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!(" {:<11}", line.agent.as_str()),
                        Style::default().fg(agent_color(line.agent)),
                    ),
                    Span::raw(truncate_str(&line.message, width)),
                ]))
            }),
    );
    f.render_widget(List::new(items).block(block), area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let pause_indicator = if app.paused { " [PAUSED]" } else { "" };
    let text = format!(
        " tidewatch | {}{pause_indicator} | {} retained | Tab:switch  j/k:scroll  Space:pause  q:quit",
        app.active_panel.name(),
        app.snapshot.retained,
    );
    let style = match app.snapshot.connectivity {
        Connectivity::Online => Style::default().fg(Color::White).bg(Color::DarkGray),
        Connectivity::Offline => Style::default().fg(Color::White).bg(Color::Red),
    };
    f.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), area);
}
