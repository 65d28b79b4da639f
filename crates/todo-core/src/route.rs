//! Route Guard
//!
//! Which view may render for the current session, and where to redirect
//! when it may not.

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The to-do list
    Home,
    Login,
    Register,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    /// Unknown paths fall back to the home view
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/login" => Route::Login,
            "/register" => Route::Register,
            _ => Route::Home,
        }
    }

    pub fn requires_identity(self) -> bool {
        matches!(self, Route::Home)
    }
}

/// Redirect target for `route`, if the session does not allow it.
///
/// No redirect happens while the session is still loading.
pub fn route_guard(session: &SessionState, route: Route) -> Option<Route> {
    if session.loading {
        return None;
    }
    match (route.requires_identity(), session.is_signed_in()) {
        (true, false) => Some(Route::Login),
        (false, true) => Some(Route::Home),
        _ => None,
    }
}

/// Whether `route`'s content may be shown; otherwise a loader is shown
pub fn can_render(session: &SessionState, route: Route) -> bool {
    !session.loading && route_guard(session, route).is_none()
}
