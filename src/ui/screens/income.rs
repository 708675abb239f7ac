use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::report;
use crate::ui::app::App;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(4)])
        .split(area);

    render_income_table(f, chunks[0], app);
    render_source_breakdown(f, chunks[1], app);
}

fn render_income_table(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();

    if app.incomes.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No income recorded for this month",
                palette.dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :income <source> <amount> [hours] [description]",
                palette.dim_style(),
            )),
        ])
        .centered()
        .block(block(app));
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["Date", "Source", "Hours", "Description", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(palette.header_style()));
    let header = Row::new(header_cells).height(1);

    let page = area.height.saturating_sub(3) as usize;
    let rows: Vec<Row> = app
        .incomes
        .iter()
        .enumerate()
        .skip(app.income_scroll)
        .take(page.max(1))
        .map(|(i, income)| {
            let hours = income
                .hours_worked
                .map(|h| format!("{h:.1}"))
                .unwrap_or_else(|| "-".to_string());
            let style = if i == app.income_index {
                palette.selected_style()
            } else if i % 2 == 0 {
                palette.alt_row_style()
            } else {
                palette.normal_style()
            };
            Row::new(vec![
                Cell::from(income.date.clone()),
                Cell::from(income.source.as_str()),
                Cell::from(hours),
                Cell::from(truncate(&income.description, 28)),
                Cell::from(format_amount(income.amount)).style(if i == app.income_index {
                    palette.selected_style()
                } else {
                    palette.income_style()
                }),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Min(18),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths).header(header).block(block(app));
    f.render_widget(table, area);
}

fn render_source_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();

    let mut spans: Vec<Span> = Vec::new();
    for group in &app.summary.income_by_source {
        if !spans.is_empty() {
            spans.push(Span::styled(" | ", Style::default().fg(palette.overlay)));
        }
        spans.push(Span::styled(
            format!("{}: ", group.source),
            palette.dim_style(),
        ));
        spans.push(Span::styled(
            format_amount(group.amount),
            palette.income_style(),
        ));
    }
    if spans.is_empty() {
        spans.push(Span::styled("No income yet", palette.dim_style()));
    }

    let rate_line = match report::tips_hourly_rate(&app.incomes) {
        Some(rate) => Line::from(vec![
            Span::styled("Tips hourly rate: ", palette.dim_style()),
            Span::styled(
                format!("{}/h", format_amount(rate)),
                Style::default()
                    .fg(palette.yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(""),
    };

    let panel = Paragraph::new(vec![Line::from(spans), rate_line]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.overlay))
            .title(Span::styled(
                " By Source ".to_string(),
                Style::default()
                    .fg(palette.text_dim)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(panel, area);
}

fn block(app: &App) -> Block<'static> {
    let palette = app.palette();
    let title = format!(
        " Income for {} ({}) | {} ",
        app.selected_month,
        app.incomes.len(),
        format_amount(app.totals.total_income),
    );
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.overlay))
        .title(Span::styled(
            title,
            Style::default()
                .fg(palette.text_dim)
                .add_modifier(Modifier::BOLD),
        ))
}
