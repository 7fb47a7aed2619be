//! The signed-in user's own account.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::PageHeader;
use crate::api::ProfileUpdate;
use crate::app::AppContext;
use crate::components::modal::{FormState, TextField};
use crate::components::toast::ToastKind;
use crate::core::validation::{validate_password_change, validate_profile};

stylance::import_crate_style!(css, "src/components/pages/pages.module.css");

#[component]
pub fn ProfilePage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let subtitle = Signal::derive(move || {
        ctx.session.with(|s| {
            s.user
                .as_ref()
                .map(|u| format!("Signed in as {} ({})", u.username, u.role.label()))
                .unwrap_or_default()
        })
    });

    view! {
        <PageHeader title="Profile".to_string() subtitle=subtitle />
        <ProfileSection />
        <PasswordSection />
    }
}

#[component]
fn ProfileSection() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let form = FormState::new();
    let (email, full_name) = ctx.session.with_untracked(|s| {
        let user = s.user.as_ref();
        (
            user.map(|u| u.email.clone()).unwrap_or_default(),
            user.and_then(|u| u.full_name.clone()).unwrap_or_default(),
        )
    });
    let email = RwSignal::new(email);
    let full_name = RwSignal::new(full_name);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let update = ProfileUpdate {
            email: email.get_untracked().trim().to_string(),
            full_name: Some(full_name.get_untracked().trim().to_string()).filter(|n| !n.is_empty()),
        };
        if !form.check(validate_profile(&update.email)) || form.submitting.get_untracked() {
            return;
        }
        form.submitting.set(true);
        let client = ctx.client();
        spawn_local(async move {
            match client.api().update_profile(&update).await {
                Ok(_) => ctx.toasts.push(ToastKind::Success, "Profile updated"),
                Err(e) => ctx.toasts.push(ToastKind::Error, e.message()),
            }
            form.submitting.try_set(false);
        });
    };

    view! {
        <section class=css::section>
            <h2>"Account details"</h2>
            <form on:submit=on_submit novalidate>
                <TextField label="Email" value=email error=form.error("email") kind="email" required=true />
                <TextField label="Full name" value=full_name />
                <div>
                    <button type="submit" class=css::primary disabled=move || form.submitting.get()>
                        "Save changes"
                    </button>
                </div>
            </form>
        </section>
    }
}

#[component]
fn PasswordSection() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let form = FormState::new();
    let current = RwSignal::new(String::new());
    let new = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (current_value, new_value) = (current.get_untracked(), new.get_untracked());
        let valid = form.check(validate_password_change(
            &current_value,
            &new_value,
            &confirm.get_untracked(),
        ));
        if !valid || form.submitting.get_untracked() {
            return;
        }
        form.submitting.set(true);
        let client = ctx.client();
        spawn_local(async move {
            match client.api().change_password(&current_value, &new_value).await {
                Ok(message) => {
                    let message = if message.is_empty() {
                        "Password changed".to_string()
                    } else {
                        message
                    };
                    ctx.toasts.push(ToastKind::Success, message);
                    for field in [current, new, confirm] {
                        field.try_set(String::new());
                    }
                }
                Err(e) => ctx.toasts.push(ToastKind::Error, e.message()),
            }
            form.submitting.try_set(false);
        });
    };

    view! {
        <section class=css::section>
            <h2>"Change password"</h2>
            <form on:submit=on_submit novalidate>
                <TextField
                    label="Current password"
                    value=current
                    error=form.error("current_password")
                    kind="password"
                    required=true
                />
                <TextField
                    label="New password"
                    value=new
                    error=form.error("new_password")
                    kind="password"
                    required=true
                />
                <TextField
                    label="Confirm new password"
                    value=confirm
                    error=form.error("confirm_password")
                    kind="password"
                    required=true
                />
                <div>
                    <button type="submit" class=css::primary disabled=move || form.submitting.get()>
                        "Update password"
                    </button>
                </div>
            </form>
        </section>
    }
}
