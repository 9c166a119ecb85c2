use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Welcome,
    Charts,
    PortfolioValues,
    OpenPositions,
    ClosedPositions,
    AddTransaction,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("no section is mounted at {0}")]
pub struct UnknownRoute(pub String);

impl Route {
    pub fn all() -> &'static [Route] {
        &[
            Route::Welcome,
            Route::Charts,
            Route::PortfolioValues,
            Route::OpenPositions,
            Route::ClosedPositions,
            Route::AddTransaction,
        ]
    }

    /// Path relative to the dashboard's base path.
    pub fn path(self) -> &'static str {
        match self {
            Route::Welcome => "/",
            Route::Charts => "/charts",
            Route::PortfolioValues => "/portfolio-values",
            Route::OpenPositions => "/open-positions",
            Route::ClosedPositions => "/closed-positions",
            Route::AddTransaction => "/add-transaction",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Welcome => "Welcome",
            Route::Charts => "Performance Charts",
            Route::PortfolioValues => "Portfolio Values",
            Route::OpenPositions => "Open Positions",
            Route::ClosedPositions => "Closed Positions",
            Route::AddTransaction => "Add New Transaction",
        }
    }

    /// 1-based position in the sidebar, used for the number and function keys.
    pub fn shortcut(self) -> u8 {
        Route::all().iter().position(|&r| r == self).map_or(1, |i| i as u8 + 1)
    }

    pub fn from_shortcut(n: u8) -> Option<Route> {
        let index = usize::from(n).checked_sub(1)?;
        Route::all().get(index).copied()
    }
}

/// Resolves paths under a fixed base path and tracks which section is shown.
#[derive(Debug, Clone)]
pub struct Router {
    base_path: String,
    current: Route,
}

impl Router {
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
            current: Route::Welcome,
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn set_current(&mut self, route: Route) {
        self.current = route;
    }

    pub fn is_active(&self, route: Route) -> bool {
        self.current == route
    }

    /// Accepts the path with or without the base path in front.
    pub fn resolve(&self, path: &str) -> Result<Route, UnknownRoute> {
        let relative = path.strip_prefix(&self.base_path).unwrap_or(path);
        let relative = match relative.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        Route::all()
            .iter()
            .copied()
            .find(|route| route.path() == relative)
            .ok_or_else(|| UnknownRoute(path.to_string()))
    }

    /// Full location of the current route, base path included.
    pub fn location(&self) -> String {
        match self.current {
            Route::Welcome => format!("{}/", self.base_path),
            route => format!("{}{}", self.base_path, route.path()),
        }
    }

    pub fn nav_items(&self) -> impl Iterator<Item = (Route, bool)> + '_ {
        Route::all().iter().map(move |&route| (route, self.is_active(route)))
    }
}
