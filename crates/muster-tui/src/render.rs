//! Pure view/render functions for the TUI.
//!
//! Functions here take state by immutable reference, draw to a ratatui
//! frame, and never mutate state or return effects. Re-rendering the same
//! state always draws the same frame.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use muster_core::table::HEADERS;

use crate::state::{AppState, DashboardScreen, LoginField, LoginScreen, Screen};

/// Spinner frames for in-flight requests.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Renders the entire TUI to the frame.
pub fn render(state: &AppState, frame: &mut Frame) {
    match &state.screen {
        Screen::Login(login) => render_login(login, state.spinner_frame, frame),
        Screen::Dashboard(dash) => render_dashboard(dash, state.spinner_frame, frame),
    }
}

fn spinner(frame_count: usize) -> &'static str {
    SPINNER_FRAMES[frame_count % SPINNER_FRAMES.len()]
}

/// Centers a fixed-size rect inside `area`, clamped to its bounds.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

// ============================================================================
// Login screen
// ============================================================================

fn render_login(login: &LoginScreen, frame_count: usize, frame: &mut Frame) {
    let area = centered(frame.area(), 56, 12);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Administrator Login ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [notice_area, _, email_area, password_area, _, status_area, hint_area] =
        Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

    if let Some(notice) = &login.notice {
        frame.render_widget(
            Paragraph::new(notice.as_str()).style(Style::default().fg(Color::Yellow)),
            notice_area,
        );
    }

    let field_style = |field: LoginField| {
        if login.focus == field {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };
    let cursor = |field: LoginField| if login.focus == field { "▏" } else { "" };

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("E-mail:   ", field_style(LoginField::Email)),
            Span::raw(login.email.as_str()),
            Span::raw(cursor(LoginField::Email)),
        ])),
        email_area,
    );

    let masked = "*".repeat(login.password.chars().count());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Password: ", field_style(LoginField::Password)),
            Span::raw(masked),
            Span::raw(cursor(LoginField::Password)),
        ])),
        password_area,
    );

    if login.submitting {
        frame.render_widget(
            Paragraph::new(format!("{} Signing in...", spinner(frame_count))),
            status_area,
        );
    } else if let Some(error) = &login.error {
        frame.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            status_area,
        );
    }

    frame.render_widget(
        Paragraph::new("Enter sign in   Tab switch field   Esc quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        hint_area,
    );
}

// ============================================================================
// Dashboard screen
// ============================================================================

fn render_dashboard(dash: &DashboardScreen, frame_count: usize, frame: &mut Frame) {
    let [header_area, filter_area, table_area, status_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(dash, header_area, frame);
    render_filter_line(dash, filter_area, frame);
    render_table(dash, table_area, frame);
    render_status_line(dash, frame_count, status_area, frame);

    frame.render_widget(
        Paragraph::new("r refresh   e export   / filter   l logout   q quit")
            .style(Style::default().fg(Color::DarkGray)),
        hint_area,
    );
}

fn render_header(dash: &DashboardScreen, area: Rect, frame: &mut Frame) {
    let mut spans = vec![Span::styled(
        " Attendance Records ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(display) = dash.admin.display() {
        spans.push(Span::styled(
            format!("signed in as {display}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_filter_line(dash: &DashboardScreen, area: Rect, frame: &mut Frame) {
    let line = if dash.filtering {
        Line::from(vec![
            Span::styled("/", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(dash.filter.as_str()),
            Span::raw("▏"),
        ])
    } else if dash.filter.is_empty() {
        Line::from(Span::styled(
            "/ to filter by name",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::raw(format!("filter: {}", dash.filter)),
            Span::styled("  (/ to edit)", Style::default().fg(Color::DarkGray)),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_table(dash: &DashboardScreen, area: Rect, frame: &mut Frame) {
    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h)))
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = dash
        .rows
        .iter()
        .filter(|row| row.visible)
        .map(|row| {
            if row.placeholder {
                Row::new(vec![
                    Cell::from(""),
                    Cell::from(row.subject.as_str()).style(Style::default().fg(Color::DarkGray)),
                ])
            } else {
                Row::new(vec![
                    Cell::from(row.index.to_string()),
                    Cell::from(row.subject.as_str()),
                    Cell::from(row.subject_id.as_str()),
                    Cell::from(row.time.as_str()),
                    Cell::from(row.status.as_str()),
                ])
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(16),
            Constraint::Length(8),
            Constraint::Min(20),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::TOP | Borders::BOTTOM));

    frame.render_widget(table, area);
}

fn render_status_line(dash: &DashboardScreen, frame_count: usize, area: Rect, frame: &mut Frame) {
    let paragraph = if dash.loading {
        Paragraph::new(format!("{} Loading attendance...", spinner(frame_count)))
    } else if dash.exporting {
        Paragraph::new(format!("{} Exporting report...", spinner(frame_count)))
    } else if let Some(error) = &dash.error {
        // Dedicated error region: fetch/export failures always land here.
        Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red))
    } else if let Some(notice) = &dash.notice {
        Paragraph::new(notice.as_str()).style(Style::default().fg(Color::Green))
    } else {
        let shown = dash
            .rows
            .iter()
            .filter(|r| r.visible && !r.placeholder)
            .count();
        let total = dash.rows.iter().filter(|r| !r.placeholder).count();
        let counts = if shown == total {
            format!("{total} record(s)")
        } else {
            format!("{shown} of {total} record(s)")
        };
        match &dash.last_updated {
            Some(at) => Paragraph::new(format!("{counts}, updated {at}")),
            None => Paragraph::new(counts),
        }
    };
    frame.render_widget(paragraph, area);
}
