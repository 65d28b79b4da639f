//! Login Page Component
//!
//! Email/password and Google sign-in.

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_core::forms::{FieldErrors, LoginForm};
use todo_core::{AuthError, FederatedCredential, Route};

use crate::components::FormField;
use crate::context::SessionContext;
use crate::interop;
use crate::router::RouterContext;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let router = expect_context::<RouterContext>();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let errors = RwSignal::new(FieldErrors::default());

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = LoginForm {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        if !form.is_complete() {
            return;
        }
        let manager = session.manager();
        spawn_local(async move {
            if let Err(err) = manager.sign_in_with_password(&form.email, &form.password).await {
                tracing::warn!(error = %err, "password sign-in failed");
                errors.set(FieldErrors::for_login(&err));
            }
        });
    };

    let sign_in_with_google = move |_| {
        let manager = session.manager();
        spawn_local(async move {
            let result = match interop::google_id_token().await {
                Ok(token) => manager.sign_in_with_federated(&FederatedCredential::google(token)).await,
                Err(err) => Err(AuthError::Unknown(err)),
            };
            if let Err(err) = result {
                tracing::warn!(error = %err, "federated sign-in failed");
                errors.set(FieldErrors::for_federated(&err));
            }
        });
    };

    let on_email = Callback::new(move |value: String| {
        set_email.set(value);
        errors.update(FieldErrors::clear_login);
    });
    let on_password = Callback::new(move |value: String| {
        set_password.set(value);
        errors.update(FieldErrors::clear_login);
    });

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Login"</h1>
                <button type="button" class="google-btn" on:click=sign_in_with_google>
                    "Login with Google"
                </button>
                <p class="auth-divider">"OR"</p>

                <form on:submit=submit>
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
                    <button type="submit" class="submit-btn">"Sign in"</button>
                </form>

                <p class="auth-switch">
                    "Not a member yet? "
                    <a href=Route::Register.path() on:click=move |ev| {
                        ev.prevent_default();
                        router.navigate(Route::Register);
                    }>"Register Now"</a>
                </p>
            </div>
        </div>
    }
}
