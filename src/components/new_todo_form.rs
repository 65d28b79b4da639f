//! New To-Do Form Component
//!
//! Input for adding items; Enter or the + button submits.

use leptos::prelude::*;

use crate::context::ListContext;

#[component]
pub fn NewTodoForm(#[prop(into)] greeting: Signal<String>) -> impl IntoView {
    let list = expect_context::<ListContext>();
    let (input, set_input) = signal(String::new());

    // Input is cleared only once the item exists.
    let add = move || {
        let text = input.get_untracked();
        list.add(text, move || set_input.set(String::new()));
    };

    view! {
        <div class="new-todo-form">
            <input
                type="text"
                placeholder=move || format!("🤔 What's the plan for today, {}?", greeting.get())
                autofocus=true
                prop:value=move || input.get()
                on:input=move |ev| set_input.set(event_target_value(&ev))
                on:keyup=move |ev| {
                    if ev.key() == "Enter" && !input.get_untracked().is_empty() {
                        add();
                    }
                }
            />
            <button class="add-btn" title="Add" on:click=move |_| add()>"+"</button>
        </div>
    }
}
