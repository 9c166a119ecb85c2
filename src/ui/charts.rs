use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, List, ListItem, Tabs,
    },
    Frame,
};

use super::{render_notice, render_pending, Palette, NO_DATA};
use crate::view::charts::{ChartTab, ChartsView, Plot, Series, Slice};

const TITLE: &str = "Performance Charts";

pub(super) fn render(f: &mut Frame, area: Rect, view: &ChartsView, palette: Palette) {
    if render_pending(f, area, TITLE, &view.state, palette).is_none() {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let titles: Vec<Line> = ChartTab::all().iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(TITLE))
        .style(Style::default().fg(palette.text))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .select(view.active_tab().index());
    f.render_widget(tabs, chunks[0]);

    let Some(handle) = view.canvas() else {
        render_notice(f, chunks[1], view.active_tab().heading(), NO_DATA, palette.muted);
        return;
    };

    let heading = handle.tab.heading();
    match &handle.plot {
        Plot::Lines { series, dates, y_bounds } => {
            render_series(f, chunks[1], heading, series, dates, *y_bounds, false, palette)
        }
        Plot::Bars { series, dates, y_bounds } => {
            render_series(f, chunks[1], heading, series, dates, *y_bounds, true, palette)
        }
        Plot::Allocation { slices } => render_allocation(f, chunks[1], heading, slices, palette),
        Plot::Empty => render_notice(f, chunks[1], heading, NO_DATA, palette.muted),
    }
}

/// Draws `series` as lines, or with `bars` as one column per point rising from zero.
#[allow(clippy::too_many_arguments)]
fn render_series(
    f: &mut Frame,
    area: Rect,
    heading: &str,
    series: &[Series],
    dates: &[String],
    y_bounds: [f64; 2],
    bars: bool,
    palette: Palette,
) {
    let columns: Vec<(Color, [(f64, f64); 2])> = if bars {
        series
            .iter()
            .flat_map(|s| s.points.iter().map(move |&(x, y)| (s.color, [(x, 0.0), (x, y)])))
            .collect()
    } else {
        Vec::new()
    };

    // Named datasets carry the legend; bar columns are drawn unnamed.
    let mut datasets: Vec<Dataset> = series
        .iter()
        .map(|s| {
            let dataset = Dataset::default()
                .name(s.name)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(s.color));
            if bars {
                dataset
            } else {
                dataset.data(&s.points)
            }
        })
        .collect();
    datasets.extend(columns.iter().map(|(color, column)| {
        Dataset::default()
            .marker(symbols::Marker::Bar)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(*color))
            .data(column)
    }));

    let max_x = dates.len().saturating_sub(1).max(1) as f64;
    let x_labels: Vec<Span> = match dates {
        [] => vec![],
        [only] => vec![Span::raw(only.clone())],
        [first, .., last] => vec![
            Span::raw(first.clone()),
            Span::raw(dates[dates.len() / 2].clone()),
            Span::raw(last.clone()),
        ],
    };

    let [low, high] = y_bounds;
    let y_labels = vec![
        Span::raw(format!("{:.2}", low)),
        Span::raw(format!("{:.2}", (low + high) / 2.0)),
        Span::raw(format!("{:.2}", high)),
    ];

    let axis = Style::default().fg(palette.muted);
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(heading.to_string()))
        .x_axis(Axis::default().title("Date").style(axis).bounds([0.0, max_x]).labels(x_labels))
        .y_axis(Axis::default().style(axis).bounds(y_bounds).labels(y_labels));

    f.render_widget(chart, area);
}

fn render_allocation(f: &mut Frame, area: Rect, heading: &str, slices: &[Slice], palette: Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let bars: Vec<Bar> = slices
        .iter()
        .map(|slice| {
            Bar::default()
                .label(Line::from(slice.label.clone()))
                .value(slice.share.round() as u64)
                .text_value(format!("{:.0}%", slice.share))
                .style(Style::default().fg(slice.color))
        })
        .collect();

    let barchart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(heading.to_string()))
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2)
        .max(100);
    f.render_widget(barchart, chunks[0]);

    let legend: Vec<ListItem> = slices
        .iter()
        .map(|slice| {
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(slice.color)),
                Span::styled(format!("{:<10}", slice.label), Style::default().fg(palette.accent)),
                Span::styled(format!("{:>12.2}", slice.value), Style::default().fg(palette.text)),
                Span::styled(format!("{:>9.2}%", slice.share), Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();

    let list = List::new(legend).block(Block::default().borders(Borders::ALL).title("Holdings"));
    f.render_widget(list, chunks[1]);
}
