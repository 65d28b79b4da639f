//! Home Page Component
//!
//! The signed-in user's to-do list.

use leptos::prelude::*;
use todo_core::ItemId;

use crate::components::{NewTodoForm, TodoRow};
use crate::context::{ListContext, SessionContext};

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let list = expect_context::<ListContext>();

    let ids = Memo::new(move |_| {
        list.entries
            .with(|entries| entries.iter().map(|e| e.item.id.clone()).collect::<Vec<ItemId>>())
    });

    view! {
        <div class="home">
            <header class="home-header">
                <button class="sign-out-btn" title="Logout" on:click=move |_| session.sign_out()>
                    "Logout"
                </button>
            </header>

            <h1>"To-Do List"</h1>

            <NewTodoForm greeting=Signal::derive(move || session.greeting_name()) />

            <Show
                when=move || !ids.with(Vec::is_empty)
                fallback=|| view! {
                    <p class="empty-list">
                        "The to-do list is feeling a bit lonely 🥺. Help it out and add a new friend!"
                    </p>
                }
            >
                <ul class="todo-list">
                    <For
                        each=move || ids.get()
                        key=|id| id.clone()
                        children=move |id: ItemId| view! { <TodoRow id=id /> }
                    />
                </ul>
            </Show>
        </div>
    }
}
