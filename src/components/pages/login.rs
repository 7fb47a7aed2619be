//! Sign-in page.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::components::modal::{FormState, TextField};
use crate::config::APP_NAME;
use crate::core::SessionStore;
use crate::core::validation::validate_login;
use crate::models::SessionAction;

stylance::import_crate_style!(css, "src/components/pages/pages.module.css");

/// Credentials form. On success the router sends the user back to `from`.
#[component]
pub fn LoginPage(from: Option<String>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let form = FormState::new();

    let server_error = Signal::derive(move || ctx.session.with(|s| s.error.clone()));
    let busy = Signal::derive(move || ctx.session.with(|s| s.is_loading));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (user, pass) = (username.get_untracked(), password.get_untracked());
        if !form.check(validate_login(&user, &pass)) {
            return;
        }
        let client = ctx.client();
        spawn_local(async move {
            // Failures land in the session error shown above the form.
            let _ = client.api().login(&user, &pass).await;
        });
        password.set(String::new());
    };

    on_cleanup(move || {
        ctx.session_store().dispatch(SessionAction::ClearError);
    });

    let notice = from.map(|_| "Please sign in to continue.");

    view! {
        <div class=css::loginScreen>
            <div class=css::loginCard>
                <h1><Icon icon=ic::DOCUMENTS />{APP_NAME}</h1>
                {notice.map(|n| view! { <p class=css::muted>{n}</p> })}
                <form on:submit=on_submit novalidate>
                    {move || server_error.get().map(|e| view! { <div class=css::alert role="alert">{e}</div> })}
                    <TextField
                        label="Username"
                        value=username
                        error=form.error("username")
                        required=true
                    />
                    <TextField
                        label="Password"
                        value=password
                        error=form.error("password")
                        kind="password"
                        required=true
                    />
                    <button type="submit" class=css::primary disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
