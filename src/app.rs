use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info};
use std::sync::Arc;

use crate::api::provider::DataProvider;
use crate::model::{ClosedPosition, OpenPosition};
use crate::route::{Route, Router};
use crate::view::charts::ChartsView;
use crate::view::form::{FormField, TransactionForm};
use crate::view::portfolio_values::PortfolioValuesView;
use crate::view::table::TableView;
use crate::view::{Payload, UpdateSender, ViewUpdate};

const PAGE: usize = 10;

/// The section mounted for the current route. Dropping it tears the view down.
#[derive(Debug)]
pub enum Section {
    Welcome,
    Charts(ChartsView),
    PortfolioValues(PortfolioValuesView),
    OpenPositions(TableView<OpenPosition>),
    ClosedPositions(TableView<ClosedPosition>),
    AddTransaction(TransactionForm),
}

impl Section {
    pub fn route(&self) -> Route {
        match self {
            Section::Welcome => Route::Welcome,
            Section::Charts(_) => Route::Charts,
            Section::PortfolioValues(_) => Route::PortfolioValues,
            Section::OpenPositions(_) => Route::OpenPositions,
            Section::ClosedPositions(_) => Route::ClosedPositions,
            Section::AddTransaction(_) => Route::AddTransaction,
        }
    }
}

pub struct App<P> {
    provider: Arc<P>,
    updates: UpdateSender,
    pub router: Router,
    pub section: Section,
    activation: u64,
    pub show_help: bool,
    pub should_quit: bool,
    pub save_requested: bool,
}

impl<P: DataProvider + 'static> App<P> {
    pub fn new(provider: Arc<P>, updates: UpdateSender, base_path: &str) -> Self {
        Self {
            provider,
            updates,
            router: Router::new(base_path),
            section: Section::Welcome,
            activation: 0,
            show_help: false,
            should_quit: false,
            save_requested: false,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn activation(&self) -> u64 {
        self.activation
    }

    /// Unmounts the current section and mounts a fresh one for `route`.
    pub fn navigate(&mut self, route: Route) {
        // The old view goes first, so its in-flight request is aborted before anything new starts.
        self.section = Section::Welcome;
        self.activation += 1;
        self.router.set_current(route);

        let provider = self.provider.clone();
        let updates = self.updates.clone();
        let activation = self.activation;

        self.section = match route {
            Route::Welcome => Section::Welcome,
            Route::Charts => Section::Charts(ChartsView::start(provider, updates, activation)),
            Route::PortfolioValues => {
                Section::PortfolioValues(PortfolioValuesView::start(provider, updates, activation))
            }
            Route::OpenPositions => {
                Section::OpenPositions(TableView::open_positions(provider, updates, activation))
            }
            Route::ClosedPositions => {
                Section::ClosedPositions(TableView::closed_positions(provider, updates, activation))
            }
            Route::AddTransaction => Section::AddTransaction(TransactionForm::new()),
        };

        info!("🧭 Navigated to {} (activation #{})", self.router.location(), activation);
    }

    pub fn reload(&mut self) {
        info!("🔄 Reloading {}", self.router.location());
        self.navigate(self.router.current());
    }

    /// Hands a finished request to the section that asked for it.
    pub fn apply(&mut self, update: ViewUpdate) {
        if update.activation != self.activation {
            debug!("Dropping stale update for activation #{} (current #{})", update.activation, self.activation);
            return;
        }

        match (&mut self.section, update.payload) {
            (Section::OpenPositions(view), Payload::OpenPositions(result)) => view.apply(result),
            (Section::ClosedPositions(view), Payload::ClosedPositions(result)) => view.apply(result),
            (Section::PortfolioValues(view), Payload::PortfolioValues(result)) => view.apply(result),
            (Section::Charts(view), Payload::Charts(result)) => view.apply(result),
            (Section::AddTransaction(form), Payload::Submitted(result)) => form.apply(result),
            (section, payload) => {
                debug!("Update {:?} does not belong to {:?}", payload, section.route());
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            info!("👋 User requested quit");
            self.should_quit = true;
            return;
        }

        if let KeyCode::F(n) = key.code {
            if let Some(route) = Route::from_shortcut(n) {
                self.navigate(route);
            }
            return;
        }

        if matches!(self.section, Section::AddTransaction(_)) {
            self.handle_form_key(key);
        } else {
            self.handle_view_key(key);
        }
    }

    fn handle_view_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                info!("👋 User requested quit");
                self.should_quit = true;
            }
            KeyCode::Char(c @ '1'..='6') => {
                if let Some(route) = c.to_digit(10).and_then(|n| Route::from_shortcut(n as u8)) {
                    self.navigate(route);
                }
            }
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                info!("❓ Showing help screen");
                self.show_help = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.save_requested = true,
            KeyCode::Tab | KeyCode::Right => {
                if let Section::Charts(view) = &mut self.section {
                    view.next_tab();
                }
            }
            KeyCode::BackTab | KeyCode::Left => {
                if let Section::Charts(view) = &mut self.section {
                    view.previous_tab();
                }
            }
            KeyCode::Down => self.scroll(|s| s.down(1)),
            KeyCode::Up => self.scroll(|s| s.up(1)),
            KeyCode::PageDown => self.scroll(|s| s.down(PAGE)),
            KeyCode::PageUp => self.scroll(|s| s.up(PAGE)),
            KeyCode::Home => self.scroll(|s| s.home()),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Section::AddTransaction(form) = &mut self.section else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.navigate(Route::Welcome),
            KeyCode::Enter => form.submit(self.provider.clone(), self.updates.clone(), self.activation),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Left | KeyCode::Right if form.focus == FormField::Type => form.toggle_type(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.input(c),
            _ => {}
        }
    }

    fn scroll(&mut self, action: impl FnOnce(&mut dyn Scroll)) {
        match &mut self.section {
            Section::OpenPositions(view) => action(view as &mut dyn Scroll),
            Section::ClosedPositions(view) => action(view as &mut dyn Scroll),
            Section::PortfolioValues(view) => action(view as &mut dyn Scroll),
            _ => {}
        }
    }
}

trait Scroll {
    fn down(&mut self, by: usize);
    fn up(&mut self, by: usize);
    fn home(&mut self);
}

impl<R: crate::view::TableRow> Scroll for TableView<R> {
    fn down(&mut self, by: usize) {
        self.scroll_down(by);
    }
    fn up(&mut self, by: usize) {
        self.scroll_up(by);
    }
    fn home(&mut self) {
        self.scroll_home();
    }
}

impl Scroll for PortfolioValuesView {
    fn down(&mut self, by: usize) {
        self.scroll_down(by);
    }
    fn up(&mut self, by: usize) {
        self.scroll_up(by);
    }
    fn home(&mut self) {
        self.scroll_home();
    }
}
