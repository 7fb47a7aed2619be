//! Landing page: recent folders and files, upcoming events, and, for
//! administrators, the latest activity.

use chrono::Utc;
use leptos::prelude::*;
use leptos_icons::Icon;
use serde::de::DeserializeOwned;

use super::PageHeader;
use super::events::event_span;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::components::list::{ListState, use_list};
use crate::config::query::DASHBOARD_PAGE_SIZE;
use crate::models::{
    Activity, AppRoute, Event, FileLink, Folder, ResourceFamily, ResourceQuery, SortBy, SortType,
};
use crate::utils::format::{format_relative, truncate};

stylance::import_crate_style!(css, "src/components/pages/pages.module.css");

fn recent() -> ResourceQuery {
    ResourceQuery::new(DASHBOARD_PAGE_SIZE).sorted(SortBy::UpdatedAt, SortType::Desc)
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let greeting = Signal::derive(move || {
        ctx.session.with(|s| {
            s.user
                .as_ref()
                .map(|u| format!("Welcome back, {}", u.display_name()))
                .unwrap_or_else(|| "Welcome".to_string())
        })
    });
    let is_admin = Signal::derive(move || ctx.session.with(|s| s.is_admin()));

    let folders = use_list::<Folder>(ResourceFamily::Folders, recent());
    let files = use_list::<FileLink>(ResourceFamily::Files, recent());
    let today = Utc::now().format("%Y-%m-%d").to_string();
    let events = use_list::<Event>(
        ResourceFamily::Events,
        ResourceQuery::new(DASHBOARD_PAGE_SIZE)
            .sorted(SortBy::StartDate, SortType::Asc)
            .filter("start_date", today),
    );

    view! {
        <PageHeader title=greeting />
        <div class=css::grid>
            <Card title="Recent folders" route=AppRoute::Folders list=folders empty="No folders yet."
                row=|folder: Folder| {
                    let href = AppRoute::Folder { id: folder.id.clone() }.to_hash();
                    view! {
                        <a class=css::nameCell href=href>
                            <Icon icon=ic::FOLDER />
                            {folder.name}
                        </a>
                        <span class=css::muted>{format!("{} files", folder.file_count)}</span>
                    }.into_any()
                }
            />
            <Card title="Recent files" route=AppRoute::Files list=files empty="No files yet."
                row=|file: FileLink| view! {
                    <a class=css::nameCell href=file.url target="_blank" rel="noopener noreferrer">
                        <Icon icon=ic::FILE_LINK />
                        {truncate(&file.name, 40)}
                    </a>
                    <span class=css::badge>{file.file_type}</span>
                }.into_any()
            />
            <Card title="Upcoming events" route=AppRoute::Events list=events empty="Nothing scheduled."
                row=|event: Event| {
                    let span = event_span(&event);
                    view! {
                        <span class=css::nameCell>
                            <Icon icon=ic::CALENDAR />
                            {event.title}
                        </span>
                        <span class=css::muted>{span}</span>
                    }.into_any()
                }
            />
            <Show when=move || is_admin.get()>
                <ActivityCard />
            </Show>
        </div>
    }
}

/// Only mounted for administrators, so nobody else queries the log.
#[component]
fn ActivityCard() -> impl IntoView {
    let list = use_list::<Activity>(
        ResourceFamily::Activities,
        ResourceQuery::new(DASHBOARD_PAGE_SIZE).sorted(SortBy::CreatedAt, SortType::Desc),
    );
    view! {
        <Card title="Latest activity" route=AppRoute::Activities list=list empty="No activity yet."
            row=|activity: Activity| {
                let who = activity.username.clone().unwrap_or_else(|| "system".to_string());
                let what = activity
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("{} {}", activity.action, activity.resource_type));
                view! {
                    <span>{format!("{}: {}", who, truncate(&what, 50))}</span>
                    <span class=css::muted>{format_relative(&activity.created_at, &Utc::now())}</span>
                }.into_any()
            }
        />
    }
}

/// Summary panel of one list with a link to its page.
#[component]
fn Card<R, F>(
    title: &'static str,
    route: AppRoute,
    list: ListState<R>,
    empty: &'static str,
    row: F,
) -> impl IntoView
where
    R: Clone + DeserializeOwned + Send + Sync + 'static,
    F: Fn(R) -> AnyView + Copy + Send + Sync + 'static,
{
    let total = move || list.meta().map(|m| m.total_items.to_string()).unwrap_or_default();

    view! {
        <section class=css::card>
            <h2 class=css::cardTitle>
                <span>{title} " " <span class=css::muted>{total}</span></span>
                <a href=route.to_hash()>"View all"</a>
            </h2>
            {move || {
                if list.is_initial_load() {
                    view! { <p class=css::muted>"Loading..."</p> }.into_any()
                } else if let Some(error) = list.error() {
                    view! { <p class=css::muted>{error}</p> }.into_any()
                } else if list.is_empty() {
                    view! { <p class=css::muted>{empty}</p> }.into_any()
                } else {
                    view! {
                        <ul class=css::cardList>
                            {list.items().into_iter().map(|item| view! { <li>{row(item)}</li> }).collect_view()}
                        </ul>
                    }.into_any()
                }
            }}
        </section>
    }
}
