//! Form Field Component
//!
//! Labelled input with an error state; password fields get a show/hide
//! toggle.

use leptos::prelude::*;

#[component]
pub fn FormField(
    #[prop(into)] label: String,
    #[prop(into)] input_type: String,
    #[prop(into)] error: Signal<Option<String>>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(optional)] password: bool,
) -> impl IntoView {
    let (visible, set_visible) = signal(false);
    let kind = move || {
        if password && visible.get() {
            "text".to_string()
        } else {
            input_type.clone()
        }
    };

    view! {
        <div class=move || if error.with(Option::is_some) { "form-field error" } else { "form-field" }>
            <label>
                <span class="field-label">{label}</span>
                <input
                    type=kind
                    required=true
                    autocomplete="off"
                    on:input=move |ev| on_input.run(event_target_value(&ev))
                />
            </label>
            <Show when=move || password>
                <button
                    type="button"
                    class="toggle-password"
                    on:click=move |_| set_visible.update(|v| *v = !*v)
                >
                    {move || if visible.get() { "Hide Password" } else { "Show Password" }}
                </button>
            </Show>
        </div>
    }
}
