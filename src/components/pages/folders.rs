//! Folder list and folder detail pages.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_icons::Icon;

use super::files::{FileFormModal, MoveFileModal};
use super::{Dialog, PageHeader, confirm_delete};
use crate::api::folder_key;
use crate::api::resources::FolderInput;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::components::list::{ListFeedback, Pagination, SearchBox, SortHeader, use_list};
use crate::components::modal::{FormActions, FormState, Modal, SelectField, TextArea, TextField};
use crate::core::validation::validate_folder_name;
use crate::core::{QuerySnapshot, QueryStatus};
use crate::models::{
    AppRoute, FileLink, Folder, FolderContents, Item, MutationResponse, ResourceFamily,
    ResourceQuery, SortBy, SortType,
};
use crate::utils::format::{format_date, format_size};

stylance::import_crate_style!(css, "src/components/pages/pages.module.css");

const FAMILY: ResourceFamily = ResourceFamily::Folders;

/// Folders offered by move and placement pickers.
const PICKER_LIMIT: u32 = 100;

// =============================================================================
// Folder list
// =============================================================================

#[component]
pub fn FoldersPage() -> impl IntoView {
    let list = use_list::<Folder>(
        FAMILY,
        ResourceQuery::default().sorted(SortBy::Name, SortType::Asc),
    );
    let dialog = RwSignal::new(Dialog::<Folder>::Closed);
    let close = Callback::new(move |_: ()| dialog.set(Dialog::Closed));

    view! {
        <PageHeader title="Folders".to_string()>
            <button class=css::primary on:click=move |_| dialog.set(Dialog::Create)>
                <Icon icon=ic::PLUS />
                "New folder"
            </button>
        </PageHeader>

        <div class=css::toolbar>
            <SearchBox query=list.query placeholder="Search folders" />
        </div>

        <ListFeedback
            loading=Signal::derive(move || list.is_initial_load())
            error=Signal::derive(move || list.error())
            empty=Signal::derive(move || list.is_empty())
            empty_message="No folders found."
            on_retry=Callback::new(move |_| list.retry())
        >
            <table class=move || if list.is_refreshing() { format!("{} {}", css::table, css::refreshing) } else { css::table.to_string() }>
                <thead>
                    <tr>
                        <th><SortHeader query=list.query field=SortBy::Name /></th>
                        <th>"Contents"</th>
                        <th><SortHeader query=list.query field=SortBy::UpdatedAt /></th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || list.items()
                        key=|folder| (folder.id.clone(), folder.updated_at)
                        children=move |folder| view! { <FolderRow folder=folder dialog=dialog /> }
                    />
                </tbody>
            </table>
        </ListFeedback>

        <Pagination query=list.query meta=Signal::derive(move || list.meta()) />

        {move || {
            let current = dialog.get();
            if current.is_form() {
                Some(view! { <FolderFormModal folder=current.editing() on_close=close /> }.into_any())
            } else {
                current.moving().map(|folder| view! { <MoveFolderModal folder=folder on_close=close /> }.into_any())
            }
        }}
    }
}

#[component]
fn FolderRow(folder: Folder, dialog: RwSignal<Dialog<Folder>>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let href = folder_href(&folder.id);
    let contents = format!(
        "{} folders · {} files",
        folder.folder_count, folder.file_count
    );
    let (edit, moving) = (folder.clone(), folder.clone());
    let (id, name) = (folder.id.clone(), folder.name.clone());

    view! {
        <tr>
            <td>
                <a class=css::nameCell href=href>
                    <Icon icon=ic::FOLDER />
                    {folder.name.clone()}
                </a>
                {folder.description.clone().map(|d| view! { <div class=css::muted>{d}</div> })}
            </td>
            <td class=css::muted>{contents}</td>
            <td class=css::muted>{format_date(&folder.updated_at)}</td>
            <td>
                <div class=css::actions>
                    <button class=css::iconButton title="Rename" on:click=move |_| dialog.set(Dialog::Edit(edit.clone()))>
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

/// Create (under `parent_id`) or rename a folder.
#[component]
pub(crate) fn FolderFormModal(
    folder: Option<Folder>,
    #[prop(default = None)] parent_id: Option<String>,
    on_close: Callback<()>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let form = FormState::new();
    let name = RwSignal::new(folder.as_ref().map(|f| f.name.clone()).unwrap_or_default());
    let description = RwSignal::new(
        folder
            .as_ref()
            .and_then(|f| f.description.clone())
            .unwrap_or_default(),
    );
    let editing = folder.map(|f| f.id);
    let title = if editing.is_some() { "Edit folder" } else { "New folder" };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let name_value = name.get_untracked();
        if !form.check(validate_folder_name(&name_value)) {
            return;
        }
        let done = move |_: MutationResponse<Folder>| on_close.run(());
        match editing.clone() {
            Some(id) => {
                // Renames keep the folder where it is.
                let input = FolderInput::new(&name_value, &description.get_untracked(), None);
                form.submit(
                    ctx,
                    FAMILY,
                    "Folder updated",
                    move |client| async move {
                        client.api().update::<Folder>(FAMILY, &id, &input).await
                    },
                    done,
                );
            }
            None => {
                let input = FolderInput::new(
                    &name_value,
                    &description.get_untracked(),
                    parent_id.clone(),
                );
                form.submit(
                    ctx,
                    FAMILY,
                    "Folder created",
                    move |client| async move { client.api().create::<Folder>(FAMILY, &input).await },
                    done,
                );
            }
        }
    };

    view! {
        <Modal title=title.to_string() on_close=on_close>
            <form on:submit=on_submit novalidate>
                <TextField label="Name" value=name error=form.error("name") required=true />
                <TextArea label="Description" value=description />
                <FormActions form=form submit_label="Save" on_cancel=on_close />
            </form>
        </Modal>
    }
}

/// Re-parent a folder.
#[component]
fn MoveFolderModal(folder: Folder, on_close: Callback<()>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let form = FormState::new();
    let target = RwSignal::new(folder.parent_id.clone().unwrap_or_default());
    let options = use_folder_choices(Some(folder.id.clone()), "Top level");
    let title = format!("Move \"{}\"", folder.name);
    let id = folder.id;

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let id = id.clone();
        let parent = Some(target.get_untracked()).filter(|p| !p.is_empty());
        form.submit(
            ctx,
            FAMILY,
            "Folder moved",
            move |client| async move { client.api().move_folder(&id, parent.as_deref()).await },
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

/// `(id, name)` pairs of folders for a picker, led by a "no folder" choice.
pub(crate) fn use_folder_choices(
    exclude: Option<String>,
    none_label: &'static str,
) -> Signal<Vec<(String, String)>> {
    let list = use_list::<Folder>(
        FAMILY,
        ResourceQuery::new(PICKER_LIMIT).sorted(SortBy::Name, SortType::Asc),
    );
    Signal::derive(move || {
        let mut options = vec![(String::new(), none_label.to_string())];
        options.extend(
            list.items()
                .into_iter()
                .filter(|f| exclude.as_ref() != Some(&f.id))
                .map(|f| (f.id, f.name)),
        );
        options
    })
}

// =============================================================================
// Folder detail
// =============================================================================

/// Cached folder contents for `id`, refetched after related mutations.
fn use_folder(id: String) -> Signal<QuerySnapshot<FolderContents>> {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let key = folder_key(&id);
    ctx.client().observe(&key);

    Effect::new({
        let key = key.clone();
        move |prev: Option<()>| {
            ctx.revision.track();
            let client = ctx.client();
            // Opening a folder that failed last time retries it.
            let force = prev.is_none()
                && client.snapshot::<FolderContents>(&key).status == QueryStatus::Error;
            let id = id.clone();
            spawn_local(async move {
                client.fetch_folder(&id, force).await;
            });
        }
    });

    on_cleanup({
        let key = key.clone();
        move || {
            let client = ctx.client();
            client.release(&key);
            client.prune();
        }
    });

    Signal::derive(move || {
        ctx.revision.track();
        ctx.client()
            .snapshot::<FolderContents>(&key)
            .map(|contents| (*contents).clone())
    })
}

/// What the folder page has open.
#[derive(Clone, Debug, PartialEq)]
enum FolderDialog {
    Closed,
    NewFolder,
    NewFile,
    EditFolder(Folder),
    EditFile(FileLink),
    MoveFile(FileLink),
}

#[component]
pub fn FolderPage(id: String) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let snapshot = use_folder(id.clone());
    let dialog = RwSignal::new(FolderDialog::Closed);
    let close = Callback::new(move |_: ()| dialog.set(FolderDialog::Closed));

    let folder = Signal::derive(move || snapshot.with(|s| s.data.as_ref().map(|c| c.folder.clone())));
    let items = Signal::derive(move || {
        snapshot.with(|s| s.data.as_ref().map(|c| c.items.clone()).unwrap_or_default())
    });
    let title = Signal::derive(move || folder.get().map(|f| f.name).unwrap_or_else(|| "Folder".to_string()));
    let subtitle = Signal::derive(move || {
        folder
            .get()
            .and_then(|f| f.description)
            .unwrap_or_default()
    });
    let parent_href = Signal::derive(move || {
        folder.get().map(|f| match f.parent_id {
            Some(parent) => folder_href(&parent),
            None => AppRoute::Folders.to_hash(),
        })
    });

    let retry_id = id.clone();
    let retry = Callback::new(move |_: ()| {
        let client = ctx.client();
        let id = retry_id.clone();
        spawn_local(async move {
            client.fetch_folder(&id, true).await;
        });
    });

    view! {
        <nav class=css::breadcrumb>
            <a href=AppRoute::Folders.to_hash()>"Folders"</a>
            {move || parent_href.get().filter(|h| *h != AppRoute::Folders.to_hash()).map(|href| view! {
                <span>"/"</span>
                <a href=href>"Parent"</a>
            })}
        </nav>

        <PageHeader title=title subtitle=subtitle>
            <button class=css::secondary on:click=move |_| dialog.set(FolderDialog::NewFolder)>
                <Icon icon=ic::FOLDER />
                "New subfolder"
            </button>
            <button class=css::primary on:click=move |_| dialog.set(FolderDialog::NewFile)>
                <Icon icon=ic::FILE_LINK />
                "Add file link"
            </button>
        </PageHeader>

        <ListFeedback
            loading=Signal::derive(move || snapshot.with(QuerySnapshot::is_initial_load))
            error=Signal::derive(move || snapshot.with(|s| s.error.clone()))
            empty=Signal::derive(move || snapshot.with(|s| s.data.as_ref().is_some_and(|c| c.items.is_empty())))
            empty_message="This folder is empty."
            on_retry=retry
        >
            <table class=css::table>
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Type"</th>
                        <th>"Size"</th>
                        <th>"Updated"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || items.get()
                        key=|item| (item.id().to_string(), item.updated_at())
                        children=move |item| view! { <ItemRow item=item dialog=dialog /> }
                    />
                </tbody>
            </table>
        </ListFeedback>

        {move || {
            let parent = folder.get().map(|f| f.id);
            match dialog.get() {
                FolderDialog::Closed => None,
                FolderDialog::NewFolder => Some(view! {
                    <FolderFormModal folder=None parent_id=parent on_close=close />
                }.into_any()),
                FolderDialog::EditFolder(f) => Some(view! {
                    <FolderFormModal folder=Some(f) on_close=close />
                }.into_any()),
                FolderDialog::NewFile => Some(view! {
                    <FileFormModal file=None folder_id=parent on_close=close />
                }.into_any()),
                FolderDialog::EditFile(file) => Some(view! {
                    <FileFormModal file=Some(file) on_close=close />
                }.into_any()),
                FolderDialog::MoveFile(file) => Some(view! {
                    <MoveFileModal file=file on_close=close />
                }.into_any()),
            }
        }}
    }
}

fn folder_href(id: &str) -> String {
    AppRoute::Folder { id: id.to_string() }.to_hash()
}

/// One child of a folder: subfolders open in place, files open their link.
#[component]
fn ItemRow(item: Item, dialog: RwSignal<FolderDialog>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let family = item.family();
    let (id, name) = (item.id().to_string(), item.name().to_string());
    let updated = format_date(&item.updated_at());

    let (link, kind, size, edit, moving) = match item {
        Item::Folder(folder) => (
            view! {
                <a class=css::nameCell href=folder_href(&folder.id)>
                    <Icon icon=ic::FOLDER />
                    {folder.name.clone()}
                </a>
            }
            .into_any(),
            "Folder".to_string(),
            String::new(),
            FolderDialog::EditFolder(folder),
            None,
        ),
        Item::File(file) => (
            view! {
                <a class=css::nameCell href=file.url.clone() target="_blank" rel="noopener noreferrer">
                    <Icon icon=ic::FILE_LINK />
                    {file.name.clone()}
                    <Icon icon=ic::EXTERNAL_LINK />
                </a>
            }
            .into_any(),
            file.file_type.clone(),
            format_size(file.size),
            FolderDialog::EditFile(file.clone()),
            Some(FolderDialog::MoveFile(file)),
        ),
    };

    view! {
        <tr>
            <td>{link}</td>
            <td><span class=css::badge>{kind}</span></td>
            <td class=css::muted>{size}</td>
            <td class=css::muted>{updated}</td>
            <td>
                <div class=css::actions>
                    <button class=css::iconButton title="Edit" on:click=move |_| dialog.set(edit.clone())>
                        <Icon icon=ic::EDIT />
                    </button>
                    {moving.map(|m| view! {
                        <button class=css::iconButton title="Move" on:click=move |_| dialog.set(m.clone())>
                            <Icon icon=ic::MOVE />
                        </button>
                    })}
                    <button
                        class=format!("{} {}", css::iconButton, css::danger)
                        title="Delete"
                        on:click=move |_| confirm_delete(ctx, family, &name, id.clone())
                    >
                        <Icon icon=ic::DELETE />
                    </button>
                </div>
            </td>
        </tr>
    }
}
