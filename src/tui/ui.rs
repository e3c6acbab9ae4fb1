use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use crate::colors::{contrast_color, parse_hex};
use super::app::{App, InputMode, ViewMode};

fn rgb(hex: &str) -> Color {
    match parse_hex(hex) {
        Some((r, g, b)) => Color::Rgb(r, g, b),
        None => Color::Reset,
    }
}

/// Background from a member color with readable text on top.
fn tinted(hex: &str) -> Style {
    Style::default().bg(rgb(hex)).fg(rgb(contrast_color(hex)))
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    match app.view_mode {
        ViewMode::Calendar => {
            let rows: Vec<Row> = app
                .instances
                .iter()
                .map(|i| {
                    let assignee = i
                        .assignee_id
                        .and_then(|id| app.members.iter().find(|m| m.id == id))
                        .map(|m| m.name.clone())
                        .unwrap_or_else(|| "-".to_string());
                    let status = app
                        .base_chore(i)
                        .map(|c| c.status.to_string())
                        .unwrap_or_default();

                    Row::new(vec![
                        Cell::from(i.date.to_string()),
                        Cell::from(i.date.format("%a").to_string()),
                        Cell::from(i.title.clone()),
                        Cell::from(assignee).style(tinted(&i.color)),
                        Cell::from(status),
                        Cell::from(if i.is_recurring { "↻" } else { "" }),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Length(12),
                Constraint::Length(4),
                Constraint::Min(20),
                Constraint::Length(16),
                Constraint::Length(12),
                Constraint::Length(3),
            ];

            let title = format!("Choreust - {} ({})", app.month_title(), app.filter_name());
            let table = Table::new(rows, widths)
                .header(Row::new(vec!["Date", "Day", "Chore", "Assignee", "Status", ""])
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .bottom_margin(1))
                .block(Block::default().borders(Borders::ALL).title(title))
                .row_highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, chunks[0], &mut app.state);
        }
        ViewMode::Members => {
            let rows: Vec<Row> = app
                .members
                .iter()
                .map(|m| {
                    Row::new(vec![
                        Cell::from(m.id.to_string()),
                        Cell::from(m.name.clone()),
                        Cell::from(m.email.clone().unwrap_or_default()),
                        Cell::from(m.role.clone()),
                        Cell::from(m.color.clone()).style(tinted(&m.color)),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Length(4),
                Constraint::Min(20),
                Constraint::Length(24),
                Constraint::Length(14),
                Constraint::Length(9),
            ];

            let table = Table::new(rows, widths)
                .header(Row::new(vec!["ID", "Name", "Email", "Role", "Color"])
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .bottom_margin(1))
                .block(Block::default().borders(Borders::ALL).title("Choreust - Team"))
                .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, chunks[0], &mut app.member_state);
        }
    }

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Calendar => "q: Quit | h/l: Month | t: Today | a: Add | s: Status | f: Filter | d: Del | v: Team",
            ViewMode::Members => "q: Quit | a: Add | d: Del (unassigns chores) | v: Calendar",
        },
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title(app.message.clone().unwrap_or_default()));
    f.render_widget(help, chunks[1]);

    if app.input_mode == InputMode::Adding {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);

        let title = match app.view_mode {
            ViewMode::Calendar => match app.add_state.step {
                0 => "Add Chore: Enter Title",
                1 => "Add Chore: Enter Date (YYYY-MM-DD, empty = 1st of month)",
                2 => "Add Chore: Enter Recurrence (weekly:mon,wed / monthly:15, optional)",
                3 => "Add Chore: Enter Assignee ID (optional)",
                _ => "Add Chore",
            },
            ViewMode::Members => match app.add_state.step {
                0 => "Add Member: Enter Name",
                1 => "Add Member: Enter Color #rrggbb (optional)",
                _ => "Add Member",
            },
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(input, area);
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
