use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_comparison(f, chunks[0], app);
    render_all_budgets(f, chunks[1], app);
}

/// Budget vs. actual for the selected month. The bar is capped at 100%;
/// the percentage text is not.
fn render_comparison(f: &mut Frame, area: Rect, app: &App) {
    let block = theme::panel(format!("Budget vs Actual for {}", app.current_month));
    if app.comparisons.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No budgets set for this month",
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Use :budget <category> <amount> to set a spending limit",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = app
        .comparisons
        .iter()
        .map(|cmp| {
            let color = theme::status_color(cmp.status);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<18}", truncate(&cmp.category, 17)),
                    theme::normal_style(),
                ),
                Span::styled(
                    format!(
                        "{} / {} ",
                        format_amount(cmp.spent),
                        format_amount(cmp.budgeted)
                    ),
                    Style::default().fg(color),
                ),
                Span::styled(
                    progress_bar(cmp.display_percentage(), 20),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!(" {}% ", cmp.percentage.round_dp(1)),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(cmp.status.label(), Style::default().fg(color)),
                Span::styled(
                    format!("  left {}", format_amount(cmp.remaining)),
                    theme::dim_style(),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_all_budgets(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .budgets
        .iter()
        .enumerate()
        .map(|(i, budget)| {
            let style = if i == app.budget_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            ListItem::new(Line::from(Span::styled(
                format!(
                    " {}  {:<18} {:>14}  spent {:>14}",
                    budget.month,
                    truncate(&budget.category, 17),
                    format_amount(budget.amount),
                    format_amount(budget.spent)
                ),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(theme::panel(format!("All Budgets ({})", app.budgets.len())));
    f.render_widget(list, area);
}
