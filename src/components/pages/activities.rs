//! Activity log (administrators only).

use chrono::Utc;
use leptos::prelude::*;

use super::{DateRange, PageHeader};
use crate::components::list::{ListFeedback, Pagination, SearchBox, SortHeader, use_list};
use crate::config::query::ACTIVITY_PAGE_SIZE;
use crate::models::{Activity, ResourceFamily, ResourceQuery, SortBy, SortType};
use crate::utils::format::{format_datetime, format_relative};

stylance::import_crate_style!(css, "src/components/pages/pages.module.css");

const ACTIONS: &[&str] = &["create", "update", "delete", "move", "login", "logout"];
const RESOURCE_TYPES: &[&str] = &["folder", "file", "user", "event", "auth"];

#[component]
pub fn ActivitiesPage() -> impl IntoView {
    let list = use_list::<Activity>(
        ResourceFamily::Activities,
        ResourceQuery::new(ACTIVITY_PAGE_SIZE).sorted(SortBy::CreatedAt, SortType::Desc),
    );

    let filter_select = move |key: &'static str, all: &'static str, values: &'static [&'static str]| {
        let on_change = move |ev: leptos::ev::Event| {
            list.set_filter(key, Some(event_target_value(&ev)));
        };
        view! {
            <select on:change=on_change>
                <option value="">{all}</option>
                {values.iter().map(|value| view! {
                    <option
                        value=*value
                        selected=move || list.query.with(|q| q.filters.get(key).map(String::as_str) == Some(*value))
                    >
                        {capitalize(value)}
                    </option>
                }).collect_view()}
            </select>
        }
    };

    view! {
        <PageHeader
            title="Activity Log".to_string()
            subtitle="Every change made in the workspace.".to_string()
        />

        <div class=css::toolbar>
            <SearchBox query=list.query placeholder="Search activity" />
            <label class=css::filter>"Action" {filter_select("action", "All actions", ACTIONS)}</label>
            <label class=css::filter>"Resource" {filter_select("resource_type", "All resources", RESOURCE_TYPES)}</label>
            <DateRange query=list.query />
        </div>

        <ListFeedback
            loading=Signal::derive(move || list.is_initial_load())
            error=Signal::derive(move || list.error())
            empty=Signal::derive(move || list.is_empty())
            empty_message="No activity recorded for these filters."
            on_retry=Callback::new(move |_| list.retry())
        >
            <table class=move || if list.is_refreshing() { format!("{} {}", css::table, css::refreshing) } else { css::table.to_string() }>
                <thead>
                    <tr>
                        <th><SortHeader query=list.query field=SortBy::CreatedAt label="When" /></th>
                        <th>"User"</th>
                        <th>"Action"</th>
                        <th>"Resource"</th>
                        <th>"Details"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || list.items()
                        key=|activity| activity.id.clone()
                        children=move |activity| {
                            let now = Utc::now();
                            view! {
                                <tr>
                                    <td title=format_datetime(&activity.created_at)>
                                        {format_relative(&activity.created_at, &now)}
                                    </td>
                                    <td>{activity.username.clone().unwrap_or_else(|| "system".to_string())}</td>
                                    <td><span class=css::badge>{capitalize(&activity.action)}</span></td>
                                    <td class=css::muted>{capitalize(&activity.resource_type)}</td>
                                    <td>{activity.description.clone().unwrap_or_default()}</td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </ListFeedback>

        <Pagination query=list.query meta=Signal::derive(move || list.meta()) />
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("delete"), "Delete");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("é"), "É");
    }
}
