use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::mpsc;

mod api;
mod app;
mod config;
mod error;
mod model;
mod route;
mod ui;
mod view;

use api::demo::DemoProvider;
use api::http::HttpProvider;
use api::provider::DataProvider;
use app::App;
use config::{Config, OperatingMode};
use route::Router;

#[derive(Parser)]
#[command(name = "folio-dash")]
#[command(about = "Terminal dashboard for a personal portfolio tracker")]
struct Args {
    #[arg(long)]
    generate_config: bool,

    #[arg(short, long)]
    config: Option<String>,

    /// Section to open first, e.g. /app/charts or /open-positions
    #[arg(short, long)]
    route: Option<String>,

    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        tui_logger::init_logger(log::LevelFilter::Debug)?;
        tui_logger::set_default_level(log::LevelFilter::Debug);
    }

    print_startup_banner();

    if args.generate_config {
        config::generate_sample_config()?;
        println!("✅ Sample configuration generated at config.toml");
        return Ok(());
    }

    let config = config::load_config(args.config.as_deref())?;
    let config_path = args.config.clone().unwrap_or_else(|| "config.toml".to_string());

    match config.operating_mode {
        OperatingMode::Live => {
            info!("🚀 Starting live mode against {}", config.api_base_url);
            let provider = HttpProvider::new(&config)?;
            run_dashboard(provider, config, config_path, args.route).await
        }
        OperatingMode::Demo => {
            info!("🧪 Starting demo mode with simulated portfolio data");
            run_dashboard(DemoProvider::new(), config, config_path, args.route).await
        }
    }
}

pub fn print_startup_banner() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                    MY PORTFOLIO DASHBOARD                    ║");
    println!("║                                                              ║");
    println!("║      Positions | Portfolio Values | Performance Charts       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

async fn run_dashboard<P: DataProvider + 'static>(
    provider: P,
    config: Config,
    config_path: String,
    start: Option<String>,
) -> Result<()> {
    // An unknown start path is reported before the terminal is taken over.
    let start = match start {
        Some(path) => Router::new(&config.base_path).resolve(&path)?,
        None => route::Route::Welcome,
    };

    let (updates, mut pending) = mpsc::unbounded_channel();
    let mut app = App::new(Arc::new(provider), updates, &config.base_path);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    show_loading_screen(&mut terminal, &config, &app.provider().describe())?;
    app.navigate(start);

    info!("🎨 Starting UI loop at {}", app.router.location());
    let outcome = ui_loop(&mut terminal, &mut app, &mut pending, &config, &config_path);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn ui_loop<P: DataProvider + 'static>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<P>,
    pending: &mut mpsc::UnboundedReceiver<view::ViewUpdate>,
    config: &Config,
    config_path: &str,
) -> Result<()> {
    let refresh = Duration::from_millis(config.ui_settings.refresh_rate_ms);

    while !app.should_quit {
        while let Ok(update) = pending.try_recv() {
            debug!("📬 Update for activation #{}", update.activation);
            app.apply(update);
        }

        terminal.draw(|f| ui::draw(f, app, &config.ui_settings))?;

        if event::poll(refresh)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.save_requested {
            app.save_requested = false;
            info!("💾 Saving configuration");
            if let Err(e) = config::save_config_to_file(config, config_path) {
                error!("❌ Failed to save configuration: {}", e);
            } else {
                info!("✅ Configuration saved to {}", config_path);
            }
        }
    }

    info!("👋 Leaving dashboard");
    Ok(())
}

fn show_loading_screen(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
    source: &str,
) -> Result<()> {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Paragraph},
    };

    terminal.draw(|f| {
        let size = f.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Length(9),
                Constraint::Min(0),
            ])
            .split(size);

        let title = Paragraph::new(vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "My Portfolio Dashboard",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

        let (mode_text, mode_color) = match config.operating_mode {
            OperatingMode::Live => ("LIVE MODE - Backend Data", Color::Green),
            OperatingMode::Demo => ("DEMO MODE - Simulated Data", Color::Yellow),
        };

        let loading = Paragraph::new(vec![
            Line::from(vec![Span::styled(
                mode_text,
                Style::default().fg(mode_color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::raw("Data Source: "),
                Span::styled(source.to_string(), Style::default().fg(Color::Cyan)),
            ]),
            Line::from(vec![
                Span::raw("Base Path: "),
                Span::styled(config.base_path.clone(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(vec![
                Span::raw("Request Timeout: "),
                Span::styled(format!("{}ms", config.request_timeout_ms), Style::default().fg(Color::Green)),
            ]),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().title("Initializing").borders(Borders::ALL));

        f.render_widget(title, chunks[0]);
        f.render_widget(loading, chunks[1]);
    })?;

    Ok(())
}
