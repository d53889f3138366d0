use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Min(8),    // Breakdown + insights
            Constraint::Length(9), // Monthly series
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_breakdown(f, middle[0], app);
    render_insights(f, middle[1], app);

    render_monthly_series(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let stats = &app.stats;
    let net_color = if stats.net_amount >= Decimal::ZERO {
        theme::GREEN
    } else {
        theme::RED
    };

    render_card(f, cards[0], "Income", format_amount(stats.total_income), theme::GREEN);
    render_card(f, cards[1], "Expenses", format_amount(stats.total_expenses), theme::RED);
    render_card(f, cards[2], "Net", format_amount(stats.net_amount), net_color);
    render_card(
        f,
        cards[3],
        "Transactions",
        stats.transaction_count.to_string(),
        theme::ACCENT,
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(theme::panel(title));

    f.render_widget(text, area);
}

fn render_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let block = theme::panel("Spending by Category");
    if app.stats.category_breakdown.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses yet. Add one with :add",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let bar_width = (area.width as usize).saturating_sub(44).clamp(5, 30);
    let lines: Vec<Line> = app
        .stats
        .category_breakdown
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| {
            let color = theme::category_color(&entry.category);
            Line::from(vec![
                Span::styled("● ", Style::default().fg(color)),
                Span::styled(
                    format!("{:<18}", truncate(&entry.category, 17)),
                    theme::normal_style(),
                ),
                Span::styled(progress_bar(entry.percentage, bar_width), Style::default().fg(color)),
                Span::styled(
                    format!(" {:>5}% ", entry.percentage.round_dp(1).to_string()),
                    theme::dim_style(),
                ),
                Span::styled(format_amount(entry.amount), theme::expense_style()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_insights(f: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::new();
    for insight in &app.insights {
        let color = theme::insight_color(insight.kind);
        lines.push(Line::from(Span::styled(
            insight.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            insight.description.clone(),
            theme::normal_style(),
        )));
        if let Some(action) = &insight.action {
            lines.push(Line::from(Span::styled(
                format!("→ {action}"),
                theme::dim_style(),
            )));
        }
        lines.push(Line::from(""));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(theme::panel(format!("Insights ({})", crate::analytics::current_month())));
    f.render_widget(panel, area);
}

fn render_monthly_series(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(
        ["Month", "Income", "Expenses", "Net"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = app
        .stats
        .monthly_data
        .iter()
        .map(|m| {
            let net_style = if m.net >= Decimal::ZERO {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            Row::new(vec![
                Cell::from(m.month.clone()),
                Cell::from(Span::styled(format_amount(m.income), theme::income_style())),
                Cell::from(Span::styled(format_amount(m.expenses), theme::expense_style())),
                Cell::from(Span::styled(format_amount(m.net), net_style)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(16),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel("Last 6 Months"));
    f.render_widget(table, area);
}
