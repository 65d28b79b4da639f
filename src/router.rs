//! Browser Routing
//!
//! Keeps the current [`Route`] in a signal, in sync with the address bar.

use leptos::prelude::*;
use todo_core::Route;
use wasm_bindgen::JsValue;

fn current_route() -> Route {
    let path = window().location().pathname().unwrap_or_default();
    Route::from_path(&path)
}

#[derive(Clone, Copy)]
pub struct RouterContext {
    pub route: ReadSignal<Route>,
    set_route: WriteSignal<Route>,
}

impl RouterContext {
    pub fn new() -> Self {
        let (route, set_route) = signal(current_route());
        // Lives as long as the app; back/forward always re-reads the path.
        let _ = window_event_listener(leptos::ev::popstate, move |_| set_route.set(current_route()));
        Self { route, set_route }
    }

    pub fn navigate(&self, to: Route) {
        if self.route.get_untracked() == to {
            return;
        }
        let pushed = window()
            .history()
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(to.path())));
        if let Err(err) = pushed {
            tracing::warn!(?err, "could not update browser history");
        }
        self.set_route.set(to);
    }
}
