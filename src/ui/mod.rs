mod charts;
mod form;
mod tables;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::api::provider::DataProvider;
use crate::app::{App, Section};
use crate::config::UiSettings;
use crate::view::LoadState;

const SIDEBAR_WIDTH: u16 = 28;

/// Colours derived from `ui_settings.theme`.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub text: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Palette {
    pub fn from_theme(theme: &str) -> Self {
        match theme {
            "light" => Self {
                text: Color::Black,
                accent: Color::Blue,
                muted: Color::Gray,
            },
            _ => Self {
                text: Color::White,
                accent: Color::Cyan,
                muted: Color::DarkGray,
            },
        }
    }
}

pub fn draw<P: DataProvider + 'static>(f: &mut Frame, app: &App<P>, settings: &UiSettings) {
    let palette = Palette::from_theme(&settings.theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(f.size());

    render_sidebar(f, columns[0], app, palette);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
        .split(columns[1]);

    render_header(f, rows[0], app, palette);

    match &app.section {
        Section::Welcome => render_welcome(f, rows[1], palette),
        Section::Charts(view) => charts::render(f, rows[1], view, palette),
        Section::PortfolioValues(view) => tables::render_portfolio_values(f, rows[1], view, palette),
        Section::OpenPositions(view) => tables::render_positions(f, rows[1], view, palette),
        Section::ClosedPositions(view) => tables::render_positions(f, rows[1], view, palette),
        Section::AddTransaction(form) => form::render(f, rows[1], form, palette),
    }

    render_footer(f, rows[2], app, settings, palette);

    if app.show_help {
        render_help(f, palette);
    }
}

fn render_sidebar<P: DataProvider + 'static>(f: &mut Frame, area: Rect, app: &App<P>, palette: Palette) {
    let items: Vec<ListItem> = app
        .router
        .nav_items()
        .map(|(route, active)| {
            let (marker, style) = if active {
                ("▶", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                (" ", Style::default().fg(palette.text))
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} {}", marker, route.label()), style),
                Span::styled(format!(" [{}]", route.shortcut()), Style::default().fg(palette.muted)),
            ]))
        })
        .collect();

    let menu = List::new(items).block(Block::default().title("Menu").borders(Borders::ALL));
    f.render_widget(menu, area);
}

fn render_header<P: DataProvider + 'static>(f: &mut Frame, area: Rect, app: &App<P>, palette: Palette) {
    let header = Paragraph::new(Line::from(vec![Span::styled(
        "My Portfolio Dashboard",
        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
    )]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(app.router.location()));

    f.render_widget(header, area);
}

fn render_welcome(f: &mut Frame, area: Rect, palette: Palette) {
    let welcome = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to Your Portfolio Tracker!",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Use the navigation on the left to explore your portfolio's performance,"),
        Line::from("view positions, and add new transactions."),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("Welcome"));

    f.render_widget(welcome, area);
}

fn render_footer<P: DataProvider + 'static>(
    f: &mut Frame,
    area: Rect,
    app: &App<P>,
    settings: &UiSettings,
    palette: Palette,
) {
    let mut text = format!("Source: {} | 1-6/F1-F6 navigate | r reload | h help | q quit", app.provider().describe());
    if settings.show_debug_info {
        text.push_str(&format!(" | activation #{}", app.activation()));
    }

    let footer = Paragraph::new(text)
        .style(Style::default().fg(palette.muted))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

fn render_help(f: &mut Frame, palette: Palette) {
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let area = centered_rect(60, 70, f.size());

    let help = Paragraph::new(vec![
        Line::from(Span::styled("NAVIGATION", heading)),
        Line::from("1-6 or F1-F6        - Switch section"),
        Line::from("↑/↓ Arrow Keys      - Scroll tables"),
        Line::from("Page Up/Page Down   - Fast scroll"),
        Line::from("Home                - Jump to top"),
        Line::from("Tab/Shift+Tab       - Switch chart or form field"),
        Line::from(""),
        Line::from(Span::styled("CONTROLS", heading)),
        Line::from("Q or Esc            - Quit application"),
        Line::from("Ctrl+C or Ctrl+Q    - Quit from anywhere"),
        Line::from("R                   - Reload section"),
        Line::from("S                   - Save configuration"),
        Line::from("H or ?              - Show this help"),
        Line::from(""),
        Line::from(Span::styled("ADD TRANSACTION", heading)),
        Line::from("Space or ←/→        - Toggle Buy/Sell"),
        Line::from("Enter               - Submit"),
        Line::from("Esc                 - Back to Welcome"),
        Line::from(""),
        Line::from("Press any key to return to dashboard..."),
    ])
    .style(Style::default().fg(palette.text))
    .block(Block::default().title("Help").borders(Borders::ALL));

    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

/// Renders the placeholder for a section that has nothing to draw yet.
/// Returns the ready data otherwise.
pub(crate) fn render_pending<'a, T>(
    f: &mut Frame,
    area: Rect,
    title: &str,
    state: &'a LoadState<T>,
    palette: Palette,
) -> Option<&'a T> {
    let (text, color) = match state {
        LoadState::Ready(data) => return Some(data),
        LoadState::Loading => ("Loading ...".to_string(), palette.muted),
        LoadState::Failed(message) => (format!("Error: {}", message), Color::Red),
    };
    render_notice(f, area, title, &text, color);
    None
}

pub(crate) fn render_notice(f: &mut Frame, area: Rect, title: &str, text: &str, color: Color) {
    let notice = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    f.render_widget(notice, area);
}

pub(crate) const NO_DATA: &str = "No data available.";

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::fake::FakeProvider;
    use crate::error::ApiError;
    use crate::route::Route;
    use crate::view::ViewUpdate;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    pub(crate) fn screen(app: &App<FakeProvider>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| draw(f, app, &UiSettings::default())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) async fn mounted(
        provider: FakeProvider,
        route: Route,
    ) -> (App<FakeProvider>, UnboundedReceiver<ViewUpdate>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(Arc::new(provider), tx, "/app");
        app.navigate(route);
        if route != Route::Welcome && route != Route::AddTransaction {
            let update = rx.recv().await.expect("update");
            app.apply(update);
        }
        (app, rx)
    }

    #[tokio::test]
    async fn welcome_is_the_landing_section() {
        let (app, _rx) = mounted(FakeProvider::default(), Route::Welcome).await;
        let text = screen(&app);

        assert!(text.contains("My Portfolio Dashboard"));
        assert!(text.contains("Welcome to Your Portfolio Tracker!"));
        assert!(text.contains("▶ Welcome"));
        assert!(text.contains("/app/"));
    }

    #[tokio::test]
    async fn only_the_active_section_is_drawn() {
        let (app, _rx) = mounted(FakeProvider::default(), Route::ClosedPositions).await;
        let text = screen(&app);

        assert!(text.contains("▶ Closed Positions"));
        assert!(!text.contains("▶ Open Positions"));
        assert!(text.contains("TSLA"));
        assert!(text.contains("Sell Price"));
        assert!(!text.contains("Welcome to Your Portfolio Tracker!"));
        assert!(text.contains("/app/closed-positions"));
    }

    #[tokio::test]
    async fn loading_state_is_shown_before_the_answer() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Arc::new(FakeProvider::default()), tx, "/app");
        app.navigate(Route::OpenPositions);

        assert!(screen(&app).contains("Loading ..."));
    }

    #[tokio::test]
    async fn failures_replace_the_section_content() {
        let provider = FakeProvider {
            open_positions: Err(ApiError::Status(502)),
            ..FakeProvider::default()
        };
        let (app, _rx) = mounted(provider, Route::OpenPositions).await;
        let text = screen(&app);

        assert!(text.contains("Error: HTTP error! status: 502"));
        assert!(!text.contains("Portfolio %"));
    }

    #[tokio::test]
    async fn help_overlay_lists_the_keys() {
        let (mut app, _rx) = mounted(FakeProvider::default(), Route::Welcome).await;
        app.show_help = true;
        let text = screen(&app);

        assert!(text.contains("Press any key to return to dashboard..."));
        assert!(text.contains("Toggle Buy/Sell"));
    }

    #[tokio::test]
    async fn footer_names_the_data_source() {
        let (app, _rx) = mounted(FakeProvider::default(), Route::Welcome).await;
        assert!(screen(&app).contains("Source: fake"));
    }
}
