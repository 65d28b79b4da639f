//! Register Page Component
//!
//! Account creation with a display name.

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_core::forms::{FieldErrors, RegisterForm};
use todo_core::Route;

use crate::components::FormField;
use crate::context::SessionContext;
use crate::router::RouterContext;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let router = expect_context::<RouterContext>();

    let (display_name, set_display_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let errors = RwSignal::new(FieldErrors::default());

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = RegisterForm {
            display_name: display_name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        if !form.is_complete() {
            return;
        }
        let manager = session.manager();
        spawn_local(async move {
            let registered = manager
                .register(&form.display_name, &form.email, &form.password)
                .await;
            if let Err(err) = registered {
                tracing::warn!(error = %err, "registration failed");
                errors.set(FieldErrors::for_register(&err));
            }
        });
    };

    let on_name = Callback::new(move |value: String| set_display_name.set(value));
    let on_email = Callback::new(move |value: String| {
        set_email.set(value);
        errors.update(|e| e.email = None);
    });
    let on_password = Callback::new(move |value: String| {
        set_password.set(value);
        errors.update(|e| e.password = None);
    });

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Register"</h1>
                <p class="auth-intro">"Ready to jump in? Just a few quick details and you're in"</p>

                <form on:submit=submit>
                    <FormField
                        label="Name"
                        input_type="text"
                        error=Signal::derive(move || errors.with(|e| e.display_name.clone()))
                        on_input=on_name
                    />
                    <FormField
                        label="Email ID"
                        input_type="email"
                        error=Signal::derive(move || errors.with(|e| e.email.clone()))
                        on_input=on_email
                    />
                    <FormField
                        label="Password"
                        input_type="password"
                        password=true
                        error=Signal::derive(move || errors.with(|e| e.password.clone()))
                        on_input=on_password
                    />
                    {move || errors.with(|e| e.summary().map(str::to_string)).map(|message| view! {
                        <p class="form-error">{message}</p>
                    })}
                    <button type="submit" class="submit-btn">"Sign Up"</button>
                </form>

                <p class="auth-switch">
                    "Already have an Account? "
                    <a href=Route::Login.path() on:click=move |ev| {
                        ev.prevent_default();
                        router.navigate(Route::Login);
                    }>"Login"</a>
                </p>
            </div>
        </div>
    }
}
