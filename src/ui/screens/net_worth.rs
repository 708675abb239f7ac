use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::util::format_amount;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5)])
        .split(area);

    render_current_card(f, chunks[0], app);
    render_series_table(f, chunks[1], app);
}

fn render_current_card(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let current = app
        .net_worth
        .last()
        .map(|e| e.cumulative_net)
        .unwrap_or(Decimal::ZERO);
    let color = if current >= Decimal::ZERO {
        palette.green
    } else {
        palette.red
    };

    let months = app.net_worth.len();
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            format_amount(current),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("accumulated over {months} recorded months"),
            palette.dim_style(),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.overlay))
            .title(Span::styled(
                " Current Net Worth ".to_string(),
                Style::default()
                    .fg(palette.text_dim)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(text, area);
}

fn render_series_table(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();

    if app.net_worth.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No history yet; every recorded month will show up here",
                palette.dim_style(),
            )),
        ])
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.overlay))
                .title(Span::styled(
                    " Monthly Series ".to_string(),
                    Style::default()
                        .fg(palette.text_dim)
                        .add_modifier(Modifier::BOLD),
                )),
        );
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["Month", "Income", "Spent", "Net", "Cumulative"]
        .iter()
        .map(|h| Cell::from(*h).style(palette.header_style()));
    let header = Row::new(header_cells).height(1);

    let page = area.height.saturating_sub(3) as usize;
    let rows: Vec<Row> = app
        .net_worth
        .iter()
        .enumerate()
        .skip(app.net_worth_scroll)
        .take(page.max(1))
        .map(|(i, entry)| {
            let style = if i == app.net_worth_index {
                palette.selected_style()
            } else if i % 2 == 0 {
                palette.alt_row_style()
            } else {
                palette.normal_style()
            };
            let net_style = if i == app.net_worth_index {
                palette.selected_style()
            } else if entry.net >= Decimal::ZERO {
                palette.income_style()
            } else {
                palette.expense_style()
            };
            let cumulative_style = if i == app.net_worth_index {
                palette.selected_style()
            } else if entry.cumulative_net >= Decimal::ZERO {
                palette.income_style().add_modifier(Modifier::BOLD)
            } else {
                palette.expense_style().add_modifier(Modifier::BOLD)
            };
            Row::new(vec![
                Cell::from(entry.month.to_string()),
                Cell::from(format_amount(entry.income)),
                Cell::from(format_amount(entry.spent)),
                Cell::from(format_amount(entry.net)).style(net_style),
                Cell::from(format_amount(entry.cumulative_net)).style(cumulative_style),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Min(13),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.overlay))
            .title(Span::styled(
                format!(" Monthly Series ({} months) ", app.net_worth.len()),
                Style::default()
                    .fg(palette.text_dim)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(table, area);
}
