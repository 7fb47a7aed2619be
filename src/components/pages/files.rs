//! File links: list with folder and type filters, plus the link dialogs
//! shared with the folder page.

use leptos::prelude::*;
use leptos_icons::Icon;

use super::folders::use_folder_choices;
use super::{Dialog, PageHeader, confirm_delete};
use crate::api::resources::FileLinkInput;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::components::list::{ListFeedback, Pagination, SearchBox, SortHeader, use_list};
use crate::components::modal::{FormActions, FormState, Modal, SelectField, TextArea, TextField};
use crate::core::validation::validate_file_link;
use crate::models::{FileLink, MutationResponse, ResourceFamily, ResourceQuery, SortBy};
use crate::utils::format::{format_date, format_size, truncate};

stylance::import_crate_style!(css, "src/components/pages/pages.module.css");

const FAMILY: ResourceFamily = ResourceFamily::Files;

/// `file_type` values the server assigns, with their labels.
const FILE_TYPES: &[(&str, &str)] = &[
    ("document", "Documents"),
    ("pdf", "PDF"),
    ("spreadsheet", "Spreadsheets"),
    ("presentation", "Presentations"),
    ("image", "Images"),
    ("video", "Video"),
    ("link", "Links"),
    ("other", "Other"),
];

#[component]
pub fn FilesPage() -> impl IntoView {
    let list = use_list::<FileLink>(FAMILY, ResourceQuery::default().sorted(SortBy::UpdatedAt, Default::default()));
    let dialog = RwSignal::new(Dialog::<FileLink>::Closed);
    let close = Callback::new(move |_: ()| dialog.set(Dialog::Closed));
    let folders = use_folder_choices(None, "All folders");

    let on_type = move |ev: leptos::ev::Event| {
        list.set_filter("file_type", Some(event_target_value(&ev)));
    };
    let on_folder = move |ev: leptos::ev::Event| {
        list.set_filter("folder_id", Some(event_target_value(&ev)));
    };
    let selected = move |key: &'static str, value: String| {
        list.query.with(|q| q.filters.get(key).map(String::as_str).unwrap_or("") == value)
    };

    view! {
        <PageHeader title="Files".to_string()>
            <button class=css::primary on:click=move |_| dialog.set(Dialog::Create)>
                <Icon icon=ic::PLUS />
                "Add file link"
            </button>
        </PageHeader>

        <div class=css::toolbar>
            <SearchBox query=list.query placeholder="Search files" />
            <label class=css::filter>
                "Type"
                <select on:change=on_type>
                    <option value="">"All types"</option>
                    {FILE_TYPES.iter().map(|(value, label)| view! {
                        <option value=*value selected=move || selected("file_type", value.to_string())>{*label}</option>
                    }).collect_view()}
                </select>
            </label>
            <label class=css::filter>
                "Folder"
                <select on:change=on_folder>
                    {move || folders.get().into_iter().map(|(value, label)| {
                        let is_selected = selected("folder_id", value.clone());
                        view! { <option value=value selected=is_selected>{label}</option> }
                    }).collect_view()}
                </select>
            </label>
        </div>

        <ListFeedback
            loading=Signal::derive(move || list.is_initial_load())
            error=Signal::derive(move || list.error())
            empty=Signal::derive(move || list.is_empty())
            empty_message="No files match."
            on_retry=Callback::new(move |_| list.retry())
        >
            <table class=move || if list.is_refreshing() { format!("{} {}", css::table, css::refreshing) } else { css::table.to_string() }>
                <thead>
                    <tr>
                        <th><SortHeader query=list.query field=SortBy::Name /></th>
                        <th>"Type"</th>
                        <th>"Size"</th>
                        <th><SortHeader query=list.query field=SortBy::UpdatedAt /></th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || list.items()
                        key=|file| (file.id.clone(), file.updated_at)
                        children=move |file| view! { <FileRow file=file dialog=dialog /> }
                    />
                </tbody>
            </table>
        </ListFeedback>

        <Pagination query=list.query meta=Signal::derive(move || list.meta()) />

        {move || match dialog.get() {
            Dialog::Closed => None,
            Dialog::Create => Some(view! { <FileFormModal file=None on_close=close /> }.into_any()),
            Dialog::Edit(file) => Some(view! { <FileFormModal file=Some(file) on_close=close /> }.into_any()),
            Dialog::Move(file) => Some(view! { <MoveFileModal file=file on_close=close /> }.into_any()),
        }}
    }
}

#[component]
fn FileRow(file: FileLink, dialog: RwSignal<Dialog<FileLink>>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let (edit, moving) = (file.clone(), file.clone());
    let (id, name) = (file.id.clone(), file.name.clone());

    view! {
        <tr>
            <td>
                <a class=css::nameCell href=file.url.clone() target="_blank" rel="noopener noreferrer">
                    <Icon icon=ic::FILE_LINK />
                    {file.name.clone()}
                    <Icon icon=ic::EXTERNAL_LINK />
                </a>
                {file.description.as_deref().map(|d| {
                    let d = truncate(d, 80);
                    view! { <div class=css::muted>{d}</div> }
                })}
            </td>
            <td><span class=css::badge>{file.file_type.clone()}</span></td>
            <td class=css::muted>{format_size(file.size)}</td>
            <td class=css::muted>{format_date(&file.updated_at)}</td>
            <td>
                <div class=css::actions>
                    <button class=css::iconButton title="Edit" on:click=move |_| dialog.set(Dialog::Edit(edit.clone()))>
                        <Icon icon=ic::EDIT />
                    </button>
                    <button class=css::iconButton title="Move" on:click=move |_| dialog.set(Dialog::Move(moving.clone()))>
                        <Icon icon=ic::MOVE />
                    </button>
                    <button
                        class=format!("{} {}", css::iconButton, css::danger)
                        title="Delete"
                        on:click=move |_| confirm_delete(ctx, FAMILY, &name, id.clone())
                    >
                        <Icon icon=ic::DELETE />
                    </button>
                </div>
            </td>
        </tr>
    }
}

// =============================================================================
// Dialogs
// =============================================================================

/// Create a link (optionally inside `folder_id`) or edit one.
#[component]
pub(crate) fn FileFormModal(
    file: Option<FileLink>,
    #[prop(default = None)] folder_id: Option<String>,
    on_close: Callback<()>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let form = FormState::new();
    let field = |f: fn(&FileLink) -> Option<String>| file.as_ref().and_then(f).unwrap_or_default();
    let name = RwSignal::new(field(|f| Some(f.name.clone())));
    let url = RwSignal::new(field(|f| Some(f.url.clone())));
    let description = RwSignal::new(field(|f| f.description.clone()));
    let folder = RwSignal::new(
        file.as_ref()
            .and_then(|f| f.folder_id.clone())
            .or(folder_id)
            .unwrap_or_default(),
    );
    let folders = use_folder_choices(None, "No folder");
    let editing = file.map(|f| f.id);
    let title = if editing.is_some() { "Edit file link" } else { "Add file link" };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (name_value, url_value) = (name.get_untracked(), url.get_untracked());
        if !form.check(validate_file_link(&name_value, &url_value)) {
            return;
        }
        let folder_id = Some(folder.get_untracked()).filter(|f| !f.is_empty());
        let input = FileLinkInput::new(&name_value, &url_value, folder_id, &description.get_untracked());
        let done = move |_: MutationResponse<FileLink>| on_close.run(());
        match editing.clone() {
            Some(id) => form.submit(
                ctx,
                FAMILY,
                "File updated",
                move |client| async move { client.api().update::<FileLink>(FAMILY, &id, &input).await },
                done,
            ),
            None => form.submit(
                ctx,
                FAMILY,
                "File link added",
                move |client| async move { client.api().create::<FileLink>(FAMILY, &input).await },
                done,
            ),
        }
    };

    view! {
        <Modal title=title.to_string() on_close=on_close>
            <form on:submit=on_submit novalidate>
                <TextField label="Name" value=name error=form.error("name") required=true />
                <TextField
                    label="URL"
                    value=url
                    error=form.error("url")
                    kind="url"
                    placeholder="https://"
                    required=true
                />
                <SelectField label="Folder" value=folder options=folders />
                <TextArea label="Description" value=description />
                <FormActions form=form submit_label="Save" on_cancel=on_close />
            </form>
        </Modal>
    }
}

/// Move a link to another folder.
#[component]
pub(crate) fn MoveFileModal(file: FileLink, on_close: Callback<()>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let form = FormState::new();
    let target = RwSignal::new(file.folder_id.clone().unwrap_or_default());
    let options = use_folder_choices(None, "No folder");
    let title = format!("Move \"{}\"", file.name);
    let id = file.id;

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let id = id.clone();
        let folder_id = Some(target.get_untracked()).filter(|f| !f.is_empty());
        form.submit(
            ctx,
            FAMILY,
            "File moved",
            move |client| async move { client.api().move_file(&id, folder_id.as_deref()).await },
            move |_| on_close.run(()),
        );
    };

    view! {
        <Modal title=title on_close=on_close>
            <form on:submit=on_submit>
                <SelectField label="Destination" value=target options=options />
                <FormActions form=form submit_label="Move" on_cancel=on_close />
            </form>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_types_are_distinct() {
        let mut values: Vec<&str> = FILE_TYPES.iter().map(|(v, _)| *v).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), FILE_TYPES.len());
        assert!(values.iter().all(|v| !v.is_empty()));
    }
}
