use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::{render_notice, render_pending, Palette, NO_DATA};
use crate::model::PortfolioSnapshot;
use crate::view::portfolio_values::PortfolioValuesView;
use crate::view::table::TableView;
use crate::view::{format_optional, TableRow};

pub(super) fn render_positions<R: TableRow>(f: &mut Frame, area: Rect, view: &TableView<R>, palette: Palette) {
    if let Some(rows) = render_pending(f, area, view.title, &view.state, palette) {
        render_rows(f, area, view.title, rows, view.offset, palette);
    }
}

pub(super) fn render_portfolio_values(f: &mut Frame, area: Rect, view: &PortfolioValuesView, palette: Palette) {
    const TITLE: &str = "Portfolio Values";

    let Some(snapshot) = render_pending(f, area, TITLE, &view.state, palette) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    render_metrics(f, chunks[0], snapshot, palette);
    render_rows(f, chunks[1], TITLE, &snapshot.rows, view.offset, palette);
}

fn render_metrics(f: &mut Frame, area: Rect, snapshot: &PortfolioSnapshot, palette: Palette) {
    let label = Style::default().fg(palette.accent).add_modifier(Modifier::BOLD);
    let metric = |name: &'static str, value: String| Line::from(vec![Span::styled(name, label), Span::raw(value)]);

    let drawdown = snapshot
        .maximum_drawdown
        .maximum_drawdown
        .map_or_else(|| "N/A".to_string(), |v| format!("{}%", v));
    let metrics = &snapshot.metrics;

    let block = Paragraph::new(vec![
        metric("Maximum Drawdown: ", drawdown),
        metric("Sharpe Ratio: ", format_optional(metrics.sharpe_ratio)),
        metric("Sortino Ratio: ", format_optional(metrics.sortino_ratio)),
        metric("Beta: ", format_optional(metrics.beta)),
        metric("Alpha (Annualized): ", format_optional(metrics.alpha)),
    ])
    .style(Style::default().fg(palette.text))
    .block(Block::default().title("Portfolio Metrics").borders(Borders::ALL));

    f.render_widget(block, area);
}

fn render_rows<R: TableRow>(f: &mut Frame, area: Rect, title: &str, rows: &[R], offset: usize, palette: Palette) {
    if rows.is_empty() {
        render_notice(f, area, title, NO_DATA, palette.muted);
        return;
    }

    let header_cells = R::HEADERS
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let body = rows.iter().skip(offset).map(|row| {
        let cells = row.cells().into_iter().map(Cell::from);
        Row::new(cells).height(1)
    });

    let columns = R::HEADERS.len() as u32;
    let widths: Vec<Constraint> = (0..columns).map(|_| Constraint::Ratio(1, columns)).collect();

    let table = Table::new(body, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ({} rows)", title, rows.len())),
        )
        .style(Style::default().fg(palette.text));

    f.render_widget(table, area);
}
