use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();

    if app.transactions.is_empty() {
        let hint = if app.search_input.is_empty() {
            "Add one with :txn <category> <amount> [description]"
        } else {
            "No matches; Esc clears the filter"
        };
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No expenses recorded for this month",
                palette.dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(hint, palette.dim_style())),
        ])
        .centered()
        .block(block(app));
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["Date", "Category", "Description", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(palette.header_style()));
    let header = Row::new(header_cells).height(1);

    let page = area.height.saturating_sub(3) as usize;
    let rows: Vec<Row> = app
        .transactions
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(page.max(1))
        .map(|(i, txn)| {
            let style = if i == app.transaction_index {
                palette.selected_style()
            } else if i % 2 == 0 {
                palette.alt_row_style()
            } else {
                palette.normal_style()
            };
            Row::new(vec![
                Cell::from(txn.date.clone()),
                Cell::from(truncate(app.category_name(txn.category_id), 18)),
                Cell::from(truncate(&txn.description, 32)),
                Cell::from(format_amount(txn.amount)).style(if i == app.transaction_index {
                    palette.selected_style()
                } else {
                    palette.expense_style()
                }),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(20),
        Constraint::Min(20),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths).header(header).block(block(app));
    f.render_widget(table, area);
}

fn block(app: &App) -> Block<'static> {
    let palette = app.palette();
    let title = format!(
        " Expenses for {} ({}) | {} ",
        app.selected_month,
        app.transactions.len(),
        format_amount(app.totals.total_spent),
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
