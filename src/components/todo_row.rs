//! To-Do Row Component
//!
//! One item, in view mode (checkbox, text, edit/delete) or edit mode
//! (draft input, save/cancel).

use leptos::prelude::*;
use todo_core::{ItemId, TodoEntry};

use crate::context::ListContext;

#[component]
pub fn TodoRow(id: ItemId) -> impl IntoView {
    let list = expect_context::<ListContext>();

    let entry = {
        let id = id.clone();
        Memo::new(move |_| list.entries.with(|entries| entries.iter().find(|e| e.item.id == id).cloned()))
    };
    let editing = Memo::new(move |_| entry.with(|e| e.as_ref().is_some_and(TodoEntry::is_editing)));
    let completed = Memo::new(move |_| entry.with(|e| e.as_ref().is_some_and(|e| e.item.completed)));
    let content = Memo::new(move |_| {
        entry.with(|e| e.as_ref().map(|e| e.item.content.clone()).unwrap_or_default())
    });
    let draft = Memo::new(move |_| {
        entry.with(|e| e.as_ref().and_then(|e| e.draft().map(str::to_string)).unwrap_or_default())
    });

    let id = StoredValue::new(id);

    view! {
        <li class=move || if completed.get() { "todo-row completed" } else { "todo-row" }>
            {move || if editing.get() {
                view! {
                    <input
                        type="text"
                        class="todo-edit-input"
                        prop:value=move || draft.get()
                        on:input=move |ev| id.with_value(|id| list.update_draft(id, &event_target_value(&ev)))
                    />
                    <div class="todo-actions">
                        <button class="save-btn" title="Save" on:click=move |_| list.save_edit(id.get_value())>
                            "✓"
                        </button>
                        <button class="cancel-btn" title="Cancel" on:click=move |_| id.with_value(|id| list.cancel_edit(id))>
                            "✗"
                        </button>
                    </div>
                }.into_any()
            } else {
                view! {
                    <label class="todo-label">
                        <input
                            type="checkbox"
                            prop:checked=move || completed.get()
                            on:change=move |ev| list.toggle(id.get_value(), event_target_checked(&ev))
                        />
                        <span class="todo-text">{move || content.get()}</span>
                    </label>
                    <div class="todo-actions">
                        <button class="edit-btn" title="Edit" on:click=move |_| id.with_value(|id| list.begin_edit(id))>
                            "✎"
                        </button>
                        <button class="delete-btn" title="Delete" on:click=move |_| list.delete(id.get_value())>
                            "×"
                        </button>
                    </div>
                }.into_any()
            }}
        </li>
    }
}
