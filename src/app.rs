//! To-Do Frontend App
//!
//! Wires the backend into the session and list controllers, keeps the list
//! following the signed-in user, and guards routes.

use std::rc::Rc;

use leptos::prelude::*;
use todo_core::{can_render, route_guard, ListController, Route, SessionManager, UserId};

use crate::backend::Backend;
use crate::components::{HomePage, Loader, LoginPage, RegisterPage};
use crate::context::{ListContext, SessionContext};
use crate::router::RouterContext;

#[component]
pub fn App() -> impl IntoView {
    let backend = Backend::connect();

    let session = SessionContext::new(Rc::new(SessionManager::init(backend.identity.clone())));
    let list = ListContext::new(Rc::new(
        ListController::new(backend.store.clone()).with_collection(backend.collection.clone()),
    ));
    let router = RouterContext::new();

    provide_context(session);
    provide_context(list);
    provide_context(router);

    // Subscribed above, so the first auth event is observed.
    let persistence = StoredValue::new_local(backend.start());
    on_cleanup(move || {
        persistence.update_value(|p| {
            p.take();
        });
    });

    // Reload the list whenever the signed-in user changes
    let owner = Memo::new(move |_| {
        session
            .state
            .with(|s| s.identity.as_ref().map(|i| i.id.clone()))
    });
    Effect::new(move |previous: Option<Option<UserId>>| {
        let current = owner.get();
        if previous.as_ref() != Some(&current) {
            list.follow_owner(current.clone());
        }
        current
    });

    Effect::new(move |_| {
        let target = session
            .state
            .with(|state| route_guard(state, router.route.get()));
        if let Some(target) = target {
            tracing::debug!(from = ?router.route.get_untracked(), to = ?target, "redirect");
            router.navigate(target);
        }
    });

    let page = Memo::new(move |_| {
        let route = router.route.get();
        session
            .state
            .with(|state| can_render(state, route).then_some(route))
    });

    view! {
        <main class="app">
            {move || match page.get() {
                Some(Route::Home) => view! { <HomePage /> }.into_any(),
                Some(Route::Login) => view! { <LoginPage /> }.into_any(),
                Some(Route::Register) => view! { <RegisterPage /> }.into_any(),
                None => view! { <Loader /> }.into_any(),
            }}
        </main>
    }
}
