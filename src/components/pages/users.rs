//! User administration.

use leptos::prelude::*;
use leptos_icons::Icon;

use super::{Dialog, PageHeader, confirm_delete};
use crate::api::resources::UserInput;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::components::list::{ListFeedback, Pagination, SearchBox, SortHeader, use_list};
use crate::components::modal::{FormActions, FormState, Modal, SelectField, TextField};
use crate::core::validation::{UserForm, validate_user};
use crate::models::{MutationResponse, ResourceFamily, ResourceQuery, Role, SortBy, SortType, User};
use crate::utils::format::format_date;

stylance::import_crate_style!(css, "src/components/pages/pages.module.css");

const FAMILY: ResourceFamily = ResourceFamily::Users;

#[component]
pub fn UsersPage() -> impl IntoView {
    let list = use_list::<User>(
        FAMILY,
        ResourceQuery::default().sorted(SortBy::Username, SortType::Asc),
    );
    let dialog = RwSignal::new(Dialog::<User>::Closed);
    let close = Callback::new(move |_: ()| dialog.set(Dialog::Closed));

    let on_role = move |ev: leptos::ev::Event| {
        list.set_filter("role", Some(event_target_value(&ev)));
    };

    view! {
        <PageHeader title="Users".to_string()>
            <button class=css::primary on:click=move |_| dialog.set(Dialog::Create)>
                <Icon icon=ic::PLUS />
                "New user"
            </button>
        </PageHeader>

        <div class=css::toolbar>
            <SearchBox query=list.query placeholder="Search by name, username or email" />
            <label class=css::filter>
                "Role"
                <select on:change=on_role>
                    <option value="">"All roles"</option>
                    {Role::ALL.iter().map(|role| {
                        let role = *role;
                        view! {
                            <option
                                value=role.as_str()
                                selected=move || list.query.with(|q| q.filters.get("role").map(String::as_str) == Some(role.as_str()))
                            >
                                {role.label()}
                            </option>
                        }
                    }).collect_view()}
                </select>
            </label>
        </div>

        <ListFeedback
            loading=Signal::derive(move || list.is_initial_load())
            error=Signal::derive(move || list.error())
            empty=Signal::derive(move || list.is_empty())
            empty_message="No users found."
            on_retry=Callback::new(move |_| list.retry())
        >
            <table class=move || if list.is_refreshing() { format!("{} {}", css::table, css::refreshing) } else { css::table.to_string() }>
                <thead>
                    <tr>
                        <th><SortHeader query=list.query field=SortBy::Username /></th>
                        <th>"Name"</th>
                        <th><SortHeader query=list.query field=SortBy::Email /></th>
                        <th>"Role"</th>
                        <th><SortHeader query=list.query field=SortBy::CreatedAt /></th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || list.items()
                        key=|user| (user.id.clone(), user.updated_at)
                        children=move |user| view! { <UserRow user=user dialog=dialog /> }
                    />
                </tbody>
            </table>
        </ListFeedback>

        <Pagination query=list.query meta=Signal::derive(move || list.meta()) />

        {move || {
            let current = dialog.get();
            current.is_form().then(|| view! { <UserFormModal user=current.editing() on_close=close /> })
        }}
    }
}

#[component]
fn UserRow(user: User, dialog: RwSignal<Dialog<User>>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let is_self = ctx.session.with_untracked(|s| s.user_id() == Some(user.id.as_str()));
    let edit = user.clone();
    let (id, username) = (user.id.clone(), user.username.clone());
    let role_class = match user.role {
        Role::Admin => css::badge.to_string(),
        Role::User => format!("{} {}", css::badge, css::badgeMuted),
    };

    view! {
        <tr>
            <td>
                {user.username.clone()}
                {(!user.is_active).then(|| view! { <span class=css::muted>" (inactive)"</span> })}
            </td>
            <td>{user.full_name.clone().unwrap_or_default()}</td>
            <td class=css::muted>{user.email.clone()}</td>
            <td><span class=role_class>{user.role.label()}</span></td>
            <td class=css::muted>{format_date(&user.created_at)}</td>
            <td>
                <div class=css::actions>
                    <button class=css::iconButton title="Edit" on:click=move |_| dialog.set(Dialog::Edit(edit.clone()))>
                        <Icon icon=ic::EDIT />
                    </button>
                    // Administrators cannot delete their own account.
                    {(!is_self).then(|| view! {
                        <button
                            class=format!("{} {}", css::iconButton, css::danger)
                            title="Delete"
                            on:click=move |_| confirm_delete(ctx, FAMILY, &username, id.clone())
                        >
                            <Icon icon=ic::DELETE />
                        </button>
                    })}
                </div>
            </td>
        </tr>
    }
}

/// Create a user, or edit one (blank password keeps the current one).
#[component]
fn UserFormModal(user: Option<User>, on_close: Callback<()>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let form = FormState::new();
    let username = RwSignal::new(user.as_ref().map(|u| u.username.clone()).unwrap_or_default());
    let email = RwSignal::new(user.as_ref().map(|u| u.email.clone()).unwrap_or_default());
    let full_name = RwSignal::new(
        user.as_ref()
            .and_then(|u| u.full_name.clone())
            .unwrap_or_default(),
    );
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(
        user.as_ref()
            .map(|u| u.role)
            .unwrap_or(Role::User)
            .as_str()
            .to_string(),
    );
    let roles: Vec<(String, String)> = Role::ALL
        .iter()
        .map(|r| (r.as_str().to_string(), r.label().to_string()))
        .collect();
    let editing = user.map(|u| u.id);
    let creating = editing.is_none();
    let title = if creating { "New user" } else { "Edit user" };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let values = UserForm {
            username: username.get_untracked(),
            email: email.get_untracked(),
            full_name: full_name.get_untracked(),
            password: password.get_untracked(),
            role: Role::parse(&role.get_untracked()),
        };
        if !form.check(validate_user(&values, creating)) {
            return;
        }
        let Some(input) = UserInput::from_form(&values) else {
            return;
        };
        let done = move |_: MutationResponse<User>| on_close.run(());
        match editing.clone() {
            Some(id) => form.submit(
                ctx,
                FAMILY,
                "User updated",
                move |client| async move { client.api().update::<User>(FAMILY, &id, &input).await },
                done,
            ),
            None => form.submit(
                ctx,
                FAMILY,
                "User created",
                move |client| async move { client.api().create::<User>(FAMILY, &input).await },
                done,
            ),
        }
    };

    let password_label = if creating { "Password" } else { "New password (optional)" };

    view! {
        <Modal title=title.to_string() on_close=on_close>
            <form on:submit=on_submit novalidate>
                <TextField label="Username" value=username error=form.error("username") required=true />
                <TextField label="Email" value=email error=form.error("email") kind="email" required=true />
                <TextField label="Full name" value=full_name />
                <TextField
                    label=password_label
                    value=password
                    error=form.error("password")
                    kind="password"
                    required=creating
                />
                <SelectField label="Role" value=role options=roles error=form.error("role") />
                <FormActions form=form submit_label="Save" on_cancel=on_close />
            </form>
        </Modal>
    }
}
