//! Loader Component
//!
//! Shown while the session is loading or a redirect is pending.

use leptos::prelude::*;

#[component]
pub fn Loader() -> impl IntoView {
    view! {
        <div class="loader">
            <div class="spinner" aria-label="Loading..."></div>
        </div>
    }
}
