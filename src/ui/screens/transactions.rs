use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::models::Category;
use crate::ui::app::App;
use crate::ui::form::{TransactionForm, FORM_FIELDS};
use crate::ui::theme;
use crate::ui::util::{format_signed, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.transactions.is_empty() {
        render_empty(f, area, app);
    } else {
        render_table(f, area, app);
    }
}

fn title(app: &App) -> String {
    let mut title = format!("Transactions ({})", app.transactions.len());
    if app.filter_by_month {
        title.push_str(&format!(" {}", app.current_month));
    }
    if !app.search_input.is_empty() {
        title.push_str(&format!(" search: '{}'", app.search_input));
    }
    title
}

fn render_empty(f: &mut Frame, area: Rect, app: &App) {
    let msg = if !app.search_input.is_empty() {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No transactions matching '{}'", app.search_input),
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled("Press Esc to clear the search", theme::dim_style())),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled("No transactions yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press a or use :add to record one, :import <file.csv> to load many",
                theme::dim_style(),
            )),
        ]
    };
    f.render_widget(
        Paragraph::new(msg).centered().block(theme::panel(title(app))),
        area,
    );
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(
        ["Date", "Description", "Category", "Type", "Amount"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1);

    let rows: Vec<Row> = app
        .transactions
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let amount_style = if txn.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };

            let style = if i == app.transaction_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(txn.date.clone()),
                Cell::from(truncate(&txn.description, 40)),
                Cell::from(Span::styled(
                    truncate(&txn.category, 18),
                    Style::default().fg(theme::category_color(&txn.category)),
                )),
                Cell::from(txn.kind.as_str()),
                Cell::from(Span::styled(
                    format_signed(txn.amount, txn.kind),
                    amount_style,
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(19),
        Constraint::Length(8),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel(title(app)));
    f.render_widget(table, area);
}

/// Add/edit popup, drawn over whichever screen opened it.
pub(crate) fn render_form(f: &mut Frame, area: Rect, form: &TransactionForm) {
    let width = 60.min(area.width.saturating_sub(4));
    let height = (FORM_FIELDS.len() as u16 + 4).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let popup = Rect::new(x, y, width, height);

    let mut lines: Vec<Line> = vec![Line::from("")];
    for (i, label) in FORM_FIELDS.iter().enumerate() {
        let focused = i == form.focus;
        let value = form.value(i);
        let shown = if TransactionForm::is_choice(i) {
            format!("‹ {value} ›")
        } else if focused {
            format!("{value}▏")
        } else {
            value.to_string()
        };
        let value_style = if focused {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::normal_style()
        };
        let mut spans = vec![
            Span::styled(format!("  {label:<12}"), theme::dim_style()),
            Span::styled(shown, value_style),
        ];
        if *label == "Category" {
            spans.push(Span::styled(
                format!("  {}", Category::icon_of(&form.category)),
                theme::dim_style(),
            ));
        }
        lines.push(Line::from(spans));
    }

    f.render_widget(Clear, popup);
    let panel = Paragraph::new(lines).block(
        theme::panel(form.title().trim())
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(panel, popup);
}
