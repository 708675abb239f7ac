use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(8),    // Budget table + savings plan
            Constraint::Length(4), // Net worth sparkline
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    render_budget_table(f, middle[0], app);
    render_savings_plan(f, middle[1], app);
    render_net_worth_sparkline(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let net = app.totals.net_income();

    render_card(
        f,
        cards[0],
        app,
        "Income",
        app.totals.total_income,
        palette.green,
        Some(format!("{} entries", app.incomes.len())),
    );
    render_card(
        f,
        cards[1],
        app,
        "Budget",
        app.totals.total_budget,
        palette.accent,
        Some(format!("{} left", format_amount(app.totals.remaining))),
    );
    render_card(
        f,
        cards[2],
        app,
        "Spent",
        app.totals.total_spent,
        palette.red,
        Some(format!(
            "{:.1}% of budget",
            crate::ui::util::budget_percent(app.totals.total_spent, app.totals.total_budget)
        )),
    );
    render_card(
        f,
        cards[3],
        app,
        "Net",
        net,
        if net >= Decimal::ZERO {
            palette.green
        } else {
            palette.red
        },
        None,
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    app: &App,
    title: &str,
    amount: Decimal,
    color: ratatui::style::Color,
    subtitle: Option<String>,
) {
    let palette = app.palette();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.overlay))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(palette.text_dim)
                .add_modifier(Modifier::BOLD),
        ));

    let sub_text = subtitle.unwrap_or_default();

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub_text, palette.dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_budget_table(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();

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
        .block(titled_block(app, " Budget vs Spent ", palette.overlay));
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["Category", "Budget", "Spent", "Left"]
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
            let left_style = if left < Decimal::ZERO {
                palette.expense_style().add_modifier(Modifier::BOLD)
            } else {
                palette.income_style()
            };
            let style = if i % 2 == 0 {
                palette.alt_row_style()
            } else {
                palette.normal_style()
            };
            Row::new(vec![
                Cell::from(truncate(&cat.name, 22)),
                Cell::from(format_amount(cat.budget)),
                Cell::from(format_amount(spent)),
                Cell::from(format_amount(left)).style(left_style),
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

    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(app, " Budget vs Spent ", palette.overlay));
    f.render_widget(table, area);
}

fn render_savings_plan(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let value_style = |v: Decimal| {
        if v >= Decimal::ZERO {
            palette.income_style().add_modifier(Modifier::BOLD)
        } else {
            palette.expense_style().add_modifier(Modifier::BOLD)
        }
    };

    // Goal and side are independent 20% cuts of the same net figure; the
    // three lines do not add up to net income, and that is intentional.
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Main (80%)  ", palette.dim_style()),
            Span::styled(format_amount(app.savings.main), value_style(app.savings.main)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Goal (20%)  ", palette.dim_style()),
            Span::styled(format_amount(app.savings.goal), value_style(app.savings.goal)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Side (20%)  ", palette.dim_style()),
            Span::styled(format_amount(app.savings.side), value_style(app.savings.side)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  of net income after expenses",
            palette.dim_style(),
        )),
    ];

    let panel = Paragraph::new(lines).block(titled_block(app, " Savings Plan ", palette.overlay));
    f.render_widget(panel, area);
}

fn render_net_worth_sparkline(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let data: Vec<u64> = app
        .net_worth
        .iter()
        .map(|e| e.cumulative_net.max(Decimal::ZERO).to_u64().unwrap_or(0))
        .collect();

    let latest = app
        .net_worth
        .last()
        .map(|e| format!(" Net Worth {} ", format_amount(e.cumulative_net)))
        .unwrap_or_else(|| " Net Worth ".to_string());

    let sparkline = Sparkline::default()
        .block(titled_block(app, &latest, palette.overlay))
        .data(&data)
        .style(Style::default().fg(palette.yellow));

    f.render_widget(sparkline, area);
}

fn titled_block(app: &App, title: &str, border: ratatui::style::Color) -> Block<'static> {
    let palette = app.palette();
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(palette.text_dim)
                .add_modifier(Modifier::BOLD),
        ))
}
