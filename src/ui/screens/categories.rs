use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    render_month_categories(f, chunks[0], app);
    render_known_categories(f, chunks[1], app);
}

fn render_month_categories(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let focused = !app.category_view_known;
    let border_color = if focused { palette.accent } else { palette.overlay };
    let title_color = if focused { palette.accent } else { palette.text_dim };

    if app.categories.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No categories for this month",
                palette.dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :category <name> <budget>",
                palette.dim_style(),
            )),
        ])
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(Span::styled(
                    format!(" Categories for {} ", app.selected_month),
                    Style::default()
                        .fg(title_color)
                        .add_modifier(Modifier::BOLD),
                )),
        );
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["Name", "Budget", "Spent", "Left"]
        .iter()
        .map(|h| Cell::from(*h).style(palette.header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .categories
        .iter()
        .enumerate()
        .map(|(i, cat)| {
            let spent = app.totals.spent_for(cat.id);
            let left = cat.budget - spent;
            let style = if focused && i == app.category_index {
                palette.selected_style()
            } else if i % 2 == 0 {
                palette.alt_row_style()
            } else {
                palette.normal_style()
            };
            let left_cell = Cell::from(format_amount(left)).style(
                if focused && i == app.category_index {
                    palette.selected_style()
                } else if left < Decimal::ZERO {
                    palette.expense_style().add_modifier(Modifier::BOLD)
                } else {
                    palette.income_style()
                },
            );
            Row::new(vec![
                Cell::from(truncate(&cat.name, 22)),
                Cell::from(format_amount(cat.budget)),
                Cell::from(format_amount(spent)),
                left_cell,
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(14),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                format!(
                    " Categories for {} ({}) ",
                    app.selected_month,
                    app.categories.len()
                ),
                Style::default()
                    .fg(title_color)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(table, area);
}

/// Every category name ever used, deduplicated by name with the most recent
/// budget. Selecting one re-adds it to the current month.
fn render_known_categories(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let focused = app.category_view_known;
    let border_color = if focused { palette.accent } else { palette.overlay };
    let title_color = if focused { palette.accent } else { palette.text_dim };

    if app.known_categories.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No categories yet", palette.dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Past months' categories show up here for quick re-adding",
                palette.dim_style(),
            )),
        ])
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(Span::styled(
                    " All Categories ".to_string(),
                    Style::default()
                        .fg(title_color)
                        .add_modifier(Modifier::BOLD),
                )),
        );
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["Name", "Last Budget", "Month"]
        .iter()
        .map(|h| Cell::from(*h).style(palette.header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .known_categories
        .iter()
        .enumerate()
        .map(|(i, cat)| {
            let style = if focused && i == app.known_index {
                palette.selected_style()
            } else {
                palette.normal_style()
            };
            Row::new(vec![
                Cell::from(truncate(&cat.name, 20)),
                Cell::from(format_amount(cat.budget)),
                Cell::from(cat.month.clone()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(12),
        Constraint::Length(12),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                format!(
                    " All Categories ({}) | Enter re-adds to {} ",
                    app.known_categories.len(),
                    app.selected_month
                ),
                Style::default()
                    .fg(title_color)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(table, area);
}
