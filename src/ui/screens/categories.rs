use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    text::Span,
    widgets::{Cell, Row, Table},
    Frame,
};

use crate::models::{Category, INCOME_CATEGORY};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::format_amount;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(
        ["", "Category", "Kind", "Icon", "Spent (all time)"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = Category::all()
        .iter()
        .enumerate()
        .map(|(i, cat)| {
            let (r, g, b) = cat.rgb();
            let kind = if cat.name == INCOME_CATEGORY {
                "income"
            } else {
                "expense"
            };
            let total = if cat.name == INCOME_CATEGORY {
                app.stats.total_income
            } else {
                app.category_total(cat.name)
            };
            let style = if i == app.category_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(Span::styled("■", Style::default().fg(Color::Rgb(r, g, b)))),
                Cell::from(cat.name),
                Cell::from(kind),
                Cell::from(Span::styled(cat.icon, theme::dim_style())),
                Cell::from(format_amount(total)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Length(20),
        Constraint::Length(9),
        Constraint::Length(14),
        Constraint::Length(18),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel(format!("Categories ({})", Category::all().len())));
    f.render_widget(table, area);
}
