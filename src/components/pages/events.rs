//! Calendar events.

use chrono::{DateTime, Duration, Timelike, Utc};
use leptos::prelude::*;
use leptos_icons::Icon;

use super::{DateRange, Dialog, PageHeader, confirm_delete};
use crate::api::resources::EventInput;
use crate::app::AppContext;
use crate::components::icons as ic;
use crate::components::list::{ListFeedback, Pagination, SearchBox, SortHeader, use_list};
use crate::components::modal::{CheckboxField, FormActions, FormState, Modal, TextArea, TextField};
use crate::core::validation::validate_event;
use crate::models::{Event, MutationResponse, ResourceFamily, ResourceQuery, SortBy, SortType};
use crate::utils::format::{format_date, format_datetime, parse_datetime_local, to_datetime_local};

stylance::import_crate_style!(css, "src/components/pages/pages.module.css");

const FAMILY: ResourceFamily = ResourceFamily::Events;

#[component]
pub fn EventsPage() -> impl IntoView {
    let list = use_list::<Event>(
        FAMILY,
        ResourceQuery::default().sorted(SortBy::StartDate, SortType::Asc),
    );
    let dialog = RwSignal::new(Dialog::<Event>::Closed);
    let close = Callback::new(move |_: ()| dialog.set(Dialog::Closed));

    view! {
        <PageHeader title="Calendar".to_string()>
            <button class=css::primary on:click=move |_| dialog.set(Dialog::Create)>
                <Icon icon=ic::PLUS />
                "New event"
            </button>
        </PageHeader>

        <div class=css::toolbar>
            <SearchBox query=list.query placeholder="Search events" />
            <DateRange query=list.query />
        </div>

        <ListFeedback
            loading=Signal::derive(move || list.is_initial_load())
            error=Signal::derive(move || list.error())
            empty=Signal::derive(move || list.is_empty())
            empty_message="No events in this range."
            on_retry=Callback::new(move |_| list.retry())
        >
            <table class=move || if list.is_refreshing() { format!("{} {}", css::table, css::refreshing) } else { css::table.to_string() }>
                <thead>
                    <tr>
                        <th><SortHeader query=list.query field=SortBy::Title /></th>
                        <th><SortHeader query=list.query field=SortBy::StartDate label="When" /></th>
                        <th>"Location"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || list.items()
                        key=|event| (event.id.clone(), event.updated_at)
                        children=move |event| view! { <EventRow event=event dialog=dialog /> }
                    />
                </tbody>
            </table>
        </ListFeedback>

        <Pagination query=list.query meta=Signal::derive(move || list.meta()) />

        {move || {
            let current = dialog.get();
            current.is_form().then(|| view! { <EventFormModal event=current.editing() on_close=close /> })
        }}
    }
}

#[component]
fn EventRow(event: Event, dialog: RwSignal<Dialog<Event>>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let edit = event.clone();
    let (id, title) = (event.id.clone(), event.title.clone());

    view! {
        <tr>
            <td>
                <span class=css::nameCell>
                    <Icon icon=ic::CALENDAR />
                    {event.title.clone()}
                </span>
                {event.description.clone().map(|d| view! { <div class=css::muted>{d}</div> })}
            </td>
            <td>{event_span(&event)}</td>
            <td class=css::muted>{event.location.clone().unwrap_or_default()}</td>
            <td>
                <div class=css::actions>
                    <button class=css::iconButton title="Edit" on:click=move |_| dialog.set(Dialog::Edit(edit.clone()))>
                        <Icon icon=ic::EDIT />
                    </button>
                    <button
                        class=format!("{} {}", css::iconButton, css::danger)
                        title="Delete"
                        on:click=move |_| confirm_delete(ctx, FAMILY, &title, id.clone())
                    >
                        <Icon icon=ic::DELETE />
                    </button>
                </div>
            </td>
        </tr>
    }
}

/// Human-readable time span of an event.
pub(crate) fn event_span(event: &Event) -> String {
    let same_day = event.start_date.date_naive() == event.end_date.date_naive();
    match (event.all_day, same_day) {
        (true, true) => format!("{} (all day)", format_date(&event.start_date)),
        (true, false) => format!(
            "{} – {}",
            format_date(&event.start_date),
            format_date(&event.end_date)
        ),
        (false, true) => format!(
            "{} – {}",
            format_datetime(&event.start_date),
            event.end_date.format("%H:%M")
        ),
        (false, false) => format!(
            "{} – {}",
            format_datetime(&event.start_date),
            format_datetime(&event.end_date)
        ),
    }
}

/// Next full hour, the default start of a new event.
fn next_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    truncated + Duration::hours(1)
}

#[component]
fn EventFormModal(event: Option<Event>, on_close: Callback<()>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let form = FormState::new();
    let default_start = next_hour(Utc::now());
    let (start, end) = event
        .as_ref()
        .map(|e| (e.start_date, e.end_date))
        .unwrap_or((default_start, default_start + Duration::hours(1)));

    let title = RwSignal::new(event.as_ref().map(|e| e.title.clone()).unwrap_or_default());
    let description = RwSignal::new(
        event
            .as_ref()
            .and_then(|e| e.description.clone())
            .unwrap_or_default(),
    );
    let location = RwSignal::new(
        event
            .as_ref()
            .and_then(|e| e.location.clone())
            .unwrap_or_default(),
    );
    let start_value = RwSignal::new(to_datetime_local(&start));
    let end_value = RwSignal::new(to_datetime_local(&end));
    let all_day = RwSignal::new(event.as_ref().is_some_and(|e| e.all_day));
    let editing = event.map(|e| e.id);
    let heading = if editing.is_some() { "Edit event" } else { "New event" };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let title_value = title.get_untracked();
        let start = parse_datetime_local(&start_value.get_untracked());
        let end = parse_datetime_local(&end_value.get_untracked());
        if !form.check(validate_event(&title_value, start, end)) {
            return;
        }
        let (Some(start_date), Some(end_date)) = (start, end) else {
            return;
        };
        let non_blank = |v: String| Some(v.trim().to_string()).filter(|v| !v.is_empty());
        let input = EventInput {
            title: title_value.trim().to_string(),
            description: non_blank(description.get_untracked()),
            location: non_blank(location.get_untracked()),
            start_date,
            end_date,
            all_day: all_day.get_untracked(),
        };
        let done = move |_: MutationResponse<Event>| on_close.run(());
        match editing.clone() {
            Some(id) => form.submit(
                ctx,
                FAMILY,
                "Event updated",
                move |client| async move { client.api().update::<Event>(FAMILY, &id, &input).await },
                done,
            ),
            None => form.submit(
                ctx,
                FAMILY,
                "Event created",
                move |client| async move { client.api().create::<Event>(FAMILY, &input).await },
                done,
            ),
        }
    };

    view! {
        <Modal title=heading.to_string() on_close=on_close>
            <form on:submit=on_submit novalidate>
                <TextField label="Title" value=title error=form.error("title") required=true />
                <TextField
                    label="Starts"
                    value=start_value
                    error=form.error("start_date")
                    kind="datetime-local"
                    required=true
                />
                <TextField
                    label="Ends"
                    value=end_value
                    error=form.error("end_date")
                    kind="datetime-local"
                    required=true
                />
                <CheckboxField label="All day" value=all_day />
                <TextField label="Location" value=location />
                <TextArea label="Description" value=description />
                <FormActions form=form submit_label="Save" on_cancel=on_close />
            </form>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn event(start: &str, end: &str, all_day: bool) -> Event {
        Event {
            id: "e1".into(),
            title: "Review".into(),
            description: None,
            location: None,
            start_date: at(start),
            end_date: at(end),
            all_day,
            created_at: at(start),
            updated_at: at(start),
        }
    }

    #[test]
    fn test_event_span() {
        assert_eq!(
            event_span(&event("2024-03-10T09:00:00Z", "2024-03-10T10:30:00Z", false)),
            "Mar 10, 2024 09:00 – 10:30"
        );
        assert_eq!(
            event_span(&event("2024-03-10T00:00:00Z", "2024-03-10T23:59:00Z", true)),
            "Mar 10, 2024 (all day)"
        );
        assert_eq!(
            event_span(&event("2024-03-10T00:00:00Z", "2024-03-12T00:00:00Z", true)),
            "Mar 10, 2024 – Mar 12, 2024"
        );
    }

    #[test]
    fn test_next_hour() {
        assert_eq!(next_hour(at("2024-03-10T09:41:12Z")), at("2024-03-10T10:00:00Z"));
        assert_eq!(next_hour(at("2024-03-10T23:05:00Z")), at("2024-03-11T00:00:00Z"));
    }
}
