//! Routed pages.
//!
//! Each page owns its list queries and dialogs; writes go through
//! [`AppContext::mutate`] so invalidation and toasts stay uniform.

mod activities;
mod dashboard;
mod events;
mod files;
mod folders;
mod login;
mod profile;
mod status;
mod users;

pub use activities::ActivitiesPage;
pub use dashboard::DashboardPage;
pub use events::EventsPage;
pub use files::FilesPage;
pub use folders::{FolderPage, FoldersPage};
pub use login::LoginPage;
pub use profile::ProfilePage;
pub use status::{NotFoundPage, UnauthorizedPage};
pub use users::UsersPage;

use leptos::prelude::*;

use crate::app::AppContext;
use crate::models::{MutationResponse, ResourceFamily, ResourceQuery};
use crate::utils::dom;
use crate::utils::format::parse_date_input;

stylance::import_crate_style!(css, "src/components/pages/pages.module.css");

/// Which dialog a list page has open.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum Dialog<T> {
    #[default]
    Closed,
    Create,
    Edit(T),
    Move(T),
}

impl<T: Clone> Dialog<T> {
    /// The record being edited, if any.
    pub fn editing(&self) -> Option<T> {
        match self {
            Self::Edit(record) => Some(record.clone()),
            _ => None,
        }
    }

    pub fn moving(&self) -> Option<T> {
        match self {
            Self::Move(record) => Some(record.clone()),
            _ => None,
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, Self::Create | Self::Edit(_))
    }
}

/// Page title row with optional actions on the right.
#[component]
pub(crate) fn PageHeader(
    #[prop(into)] title: Signal<String>,
    #[prop(optional, into)] subtitle: Option<Signal<String>>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class=css::header>
            <div>
                <h1 class=css::title>{move || title.get()}</h1>
                {subtitle.map(|s| view! { <p class=css::subtitle>{move || s.get()}</p> })}
            </div>
            <div class=css::headerActions>{children.map(|c| c())}</div>
        </div>
    }
}

/// Ask for confirmation, then delete `id` from `family`.
pub(crate) fn confirm_delete(ctx: AppContext, family: ResourceFamily, label: &str, id: String) {
    if !dom::confirm(&format!("Delete \"{}\"? This cannot be undone.", label)) {
        return;
    }
    ctx.mutate(
        family,
        format!("\"{}\" deleted", label),
        move |client| async move { client.api().remove(family, &id).await },
        |_: MutationResponse| {},
    );
}

/// `From` / `To` date inputs driving the `start_date` and `end_date` filters.
#[component]
pub(crate) fn DateRange(query: RwSignal<ResourceQuery>) -> impl IntoView {
    let bound = move |key: &'static str| {
        move |ev: leptos::ev::Event| {
            let value = parse_date_input(&event_target_value(&ev));
            query.update(|q| {
                q.set_filter(key, value);
            });
        }
    };
    let current = move |key: &'static str| {
        move || query.with(|q| q.filters.get(key).cloned().unwrap_or_default())
    };

    view! {
        <label class=css::filter>
            "From"
            <input type="date" prop:value=current("start_date") on:change=bound("start_date") />
        </label>
        <label class=css::filter>
            "To"
            <input type="date" prop:value=current("end_date") on:change=bound("end_date") />
        </label>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_accessors() {
        let dialog = Dialog::Edit(7);
        assert_eq!(dialog.editing(), Some(7));
        assert_eq!(dialog.moving(), None);
        assert!(dialog.is_form());
        assert!(!Dialog::Move(7).is_form());
        assert!(!Dialog::<u8>::Closed.is_form());
    }
}
