//! Modal dialog and form field helpers.

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_icons::Icon;

use crate::app::{AppContext, Client};
use crate::components::icons as ic;
use crate::core::{ApiError, ValidationErrors};
use crate::models::ResourceFamily;

stylance::import_crate_style!(css, "src/components/modal.module.css");

// =============================================================================
// Modal
// =============================================================================

/// Overlay dialog. Closes on Escape, on the close button, or on a click
/// outside the panel.
#[component]
pub fn Modal(
    #[prop(into)] title: Signal<String>,
    on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            on_close.run(());
        }
    };

    view! {
        <div class=css::backdrop on:click=move |_| on_close.run(()) on:keydown=on_keydown>
            <div
                class=css::panel
                role="dialog"
                aria-modal="true"
                on:click=|ev| ev.stop_propagation()
            >
                <header class=css::header>
                    <h2>{move || title.get()}</h2>
                    <button class=css::close aria-label="Close" on:click=move |_| on_close.run(())>
                        <Icon icon=ic::CLOSE />
                    </button>
                </header>
                <div class=css::body>{children()}</div>
            </div>
        </div>
    }
}

// =============================================================================
// Form state
// =============================================================================

/// Validation and submission state shared by a form's fields.
#[derive(Clone, Copy)]
pub struct FormState {
    pub errors: RwSignal<ValidationErrors>,
    pub submitting: RwSignal<bool>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            errors: RwSignal::new(ValidationErrors::new()),
            submitting: RwSignal::new(false),
        }
    }

    /// Store the outcome of a validation pass; `true` when the form may be sent.
    pub fn check(&self, result: Result<(), ValidationErrors>) -> bool {
        match result {
            Ok(()) => {
                self.errors.set(ValidationErrors::new());
                true
            }
            Err(errors) => {
                self.errors.set(errors);
                false
            }
        }
    }

    /// Send the form once; `on_success` runs only when the server accepts it.
    ///
    /// Repeated submits while a request is outstanding are ignored.
    pub fn submit<R, Fut>(
        &self,
        ctx: AppContext,
        family: ResourceFamily,
        success: impl Into<String>,
        request: impl FnOnce(Rc<Client>) -> Fut + 'static,
        on_success: impl FnOnce(R) + 'static,
    ) where
        R: 'static,
        Fut: Future<Output = Result<R, ApiError>> + 'static,
    {
        if self.submitting.get_untracked() {
            return;
        }
        self.submitting.set(true);
        let submitting = self.submitting;
        let success = success.into();
        spawn_local(async move {
            let result = ctx.run_mutation(family, success, request).await;
            submitting.try_set(false);
            if let Some(value) = result {
                on_success(value);
            }
        });
    }

    pub fn error(&self, field: &'static str) -> Signal<Option<String>> {
        let errors = self.errors;
        Signal::derive(move || errors.with(|e| e.get(field).map(str::to_string)))
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Fields
// =============================================================================

/// Labelled input bound to `value`.
#[component]
pub fn TextField(
    #[prop(into)] label: String,
    value: RwSignal<String>,
    #[prop(optional, into)] error: Option<Signal<Option<String>>>,
    #[prop(default = "text")] kind: &'static str,
    #[prop(optional, into)] placeholder: String,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    let error = error.unwrap_or_else(|| Signal::derive(|| None));
    view! {
        <label class=css::field>
            <span class=css::label>
                {label}
                {required.then_some(view! { <span class=css::required>"*"</span> })}
            </span>
            <input
                type=kind
                placeholder=placeholder
                class=move || if error.with(|e| e.is_some()) { css::invalid } else { "" }
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
            {move || error.get().map(|msg| view! { <span class=css::error>{msg}</span> })}
        </label>
    }
}

/// Labelled multi-line input bound to `value`.
#[component]
pub fn TextArea(
    #[prop(into)] label: String,
    value: RwSignal<String>,
    #[prop(default = 3)] rows: u32,
) -> impl IntoView {
    view! {
        <label class=css::field>
            <span class=css::label>{label}</span>
            <textarea
                rows=rows
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
    }
}

/// Labelled select over `(value, label)` options, bound to `value`.
#[component]
pub fn SelectField(
    #[prop(into)] label: String,
    value: RwSignal<String>,
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    #[prop(optional, into)] error: Option<Signal<Option<String>>>,
) -> impl IntoView {
    let error = error.unwrap_or_else(|| Signal::derive(|| None));
    view! {
        <label class=css::field>
            <span class=css::label>{label}</span>
            <select on:change=move |ev| value.set(event_target_value(&ev))>
                {move || options.get().into_iter().map(|(option, text)| {
                    let selected = value.get_untracked() == option;
                    view! { <option value=option selected=selected>{text}</option> }
                }).collect_view()}
            </select>
            {move || error.get().map(|msg| view! { <span class=css::error>{msg}</span> })}
        </label>
    }
}

/// Checkbox bound to `value`.
#[component]
pub fn CheckboxField(#[prop(into)] label: String, value: RwSignal<bool>) -> impl IntoView {
    view! {
        <label class=css::checkbox>
            <input
                type="checkbox"
                prop:checked=move || value.get()
                on:change=move |ev| value.set(event_target_checked(&ev))
            />
            {label}
        </label>
    }
}

/// Cancel and submit buttons; submit is disabled while a request runs.
#[component]
pub fn FormActions(
    form: FormState,
    #[prop(into)] submit_label: String,
    on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class=css::actions>
            <button type="button" class=css::secondary on:click=move |_| on_cancel.run(())>
                "Cancel"
            </button>
            <button type="submit" class=css::primary disabled=move || form.submitting.get()>
                {move || if form.submitting.get() { "Saving...".to_string() } else { submit_label.clone() }}
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::validate_folder_name;

    #[test]
    fn test_form_state_check() {
        let owner = Owner::new();
        owner.set();

        let form = FormState::new();
        assert!(!form.check(validate_folder_name("")));
        assert_eq!(
            form.error("name").get_untracked().as_deref(),
            Some("Folder name is required")
        );

        assert!(form.check(validate_folder_name("Reports")));
        assert!(form.error("name").get_untracked().is_none());
    }
}
