//! Shared list controls: debounced search, sort headers, pagination, and
//! the loading/empty/error states.

use std::cell::RefCell;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos_icons::Icon;

use crate::components::icons as ic;
use crate::config::query::{PAGE_SIZE_OPTIONS, PAGINATION_RADIUS, SEARCH_DEBOUNCE_MS};
use crate::core::Debouncer;
use crate::models::{PageLink, PageMeta, ResourceQuery, SortBy, SortType, page_window};
use crate::utils::dom::now_ms;

stylance::import_crate_style!(css, "src/components/list/list.module.css");

// =============================================================================
// Search
// =============================================================================

/// Search input that applies its term after a quiet period.
///
/// Every keystroke resets the timer; only the settled term reaches `query`,
/// together with a reset to page 1.
#[component]
pub fn SearchBox(
    query: RwSignal<ResourceQuery>,
    #[prop(into)] placeholder: String,
) -> impl IntoView {
    let initial = query.get_untracked().search.unwrap_or_default();
    let text = RwSignal::new(initial.clone());
    let debouncer = StoredValue::new(Debouncer::with_initial(SEARCH_DEBOUNCE_MS, initial));
    let timer = StoredValue::new_local(RefCell::new(None::<Timeout>));

    let settle = move || {
        if let Some(term) = debouncer.try_update_value(|d| d.poll(now_ms())).flatten() {
            apply_search(query, &term);
        }
    };

    let on_input = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        text.set(value.clone());
        debouncer.update_value(|d| {
            d.push(value, now_ms());
        });

        // Replacing the handle cancels the previous timer.
        let next = Timeout::new(SEARCH_DEBOUNCE_MS as u32, settle);
        timer.with_value(|t| t.replace(Some(next)));
    };

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter"
            && let Some(term) = debouncer.try_update_value(|d| d.flush()).flatten()
        {
            timer.with_value(|t| t.replace(None));
            apply_search(query, &term);
        }
    };

    on_cleanup(move || {
        timer.try_with_value(|t| t.replace(None));
    });

    view! {
        <label class=css::search>
            <span class=css::searchIcon aria-hidden="true"><Icon icon=ic::SEARCH /></span>
            <input
                type="search"
                placeholder=placeholder
                prop:value=move || text.get()
                on:input=on_input
                on:keydown=on_keydown
            />
        </label>
    }
}

/// Write a settled term into the current query, keeping whatever else
/// changed while the term was pending.
fn apply_search(query: RwSignal<ResourceQuery>, term: &str) {
    query.maybe_update(|q| q.set_search(term));
}

// =============================================================================
// Sorting
// =============================================================================

/// Column header that sorts by `field`.
#[component]
pub fn SortHeader(
    query: RwSignal<ResourceQuery>,
    field: SortBy,
    #[prop(optional, into)] label: Option<String>,
) -> impl IntoView {
    let label = label.unwrap_or_else(|| field.label().to_string());
    let direction = move || {
        query.with(|q| (q.sort_by == Some(field)).then_some(q.sort_type))
    };
    let on_click = move |_| {
        query.update(|q| {
            let next = match q.sort_by == Some(field) {
                true => q.sort_type.toggled(),
                false => SortType::default(),
            };
            q.set_sort(Some(field), next);
        });
    };

    view! {
        <button class=css::sortHeader on:click=on_click>
            {label}
            {move || direction().map(|d| {
                let icon = match d {
                    SortType::Asc => ic::SORT_ASC,
                    SortType::Desc => ic::SORT_DESC,
                };
                view! { <span class=css::sortIcon><Icon icon=icon /></span> }
            })}
        </button>
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Page links, range summary, and page-size selector.
#[component]
pub fn Pagination(
    query: RwSignal<ResourceQuery>,
    #[prop(into)] meta: Signal<Option<PageMeta>>,
) -> impl IntoView {
    let go = move |page: u32| {
        query.update(|q| {
            q.set_page(page);
        });
    };
    let on_limit = move |ev: leptos::ev::Event| {
        if let Ok(limit) = event_target_value(&ev).parse::<u32>() {
            query.update(|q| {
                q.set_limit(limit);
            });
        }
    };

    view! {
        <Show when=move || meta.get().is_some_and(|m| m.total_items > 0)>
            {move || meta.get().map(|m| {
                let links = page_window(m.page, m.total_pages, PAGINATION_RADIUS);
                view! {
                    <nav class=css::pagination aria-label="Pagination">
                        <span class=css::range>
                            {format!("{}-{} of {}", m.first_item(), m.last_item(), m.total_items)}
                        </span>
                        <div class=css::pages>
                            <button
                                class=css::pageButton
                                disabled=!m.has_prev
                                aria-label="Previous page"
                                on:click=move |_| go(m.page - 1)
                            >
                                <Icon icon=ic::CHEVRON_LEFT />
                            </button>
                            {links.into_iter().map(|link| match link {
                                PageLink::Page(page) => {
                                    let class = if page == m.page {
                                        format!("{} {}", css::pageButton, css::current)
                                    } else {
                                        css::pageButton.to_string()
                                    };
                                    view! {
                                        <button class=class on:click=move |_| go(page)>
                                            {page}
                                        </button>
                                    }.into_any()
                                }
                                PageLink::Gap => view! { <span class=css::gap>"..."</span> }.into_any(),
                            }).collect_view()}
                            <button
                                class=css::pageButton
                                disabled=!m.has_next
                                aria-label="Next page"
                                on:click=move |_| go(m.page + 1)
                            >
                                <Icon icon=ic::CHEVRON_RIGHT />
                            </button>
                        </div>
                        <select class=css::pageSize on:change=on_limit aria-label="Rows per page">
                            {PAGE_SIZE_OPTIONS.iter().map(|size| view! {
                                <option value=size.to_string() selected=*size == m.limit>
                                    {format!("{} / page", size)}
                                </option>
                            }).collect_view()}
                        </select>
                    </nav>
                }
            })}
        </Show>
    }
}

// =============================================================================
// States
// =============================================================================

/// Loading, error, and empty states around a list body.
///
/// The body is rendered whenever data is available, so stale rows stay
/// visible during a refetch or after a failed one.
#[component]
pub fn ListFeedback(
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] error: Signal<Option<String>>,
    #[prop(into)] empty: Signal<bool>,
    #[prop(into)] empty_message: String,
    on_retry: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    let children = StoredValue::new(children);
    let empty_message = StoredValue::new(empty_message);

    view! {
        <Show when=move || error.get().is_some()>
            <div class=css::error role="alert">
                <Icon icon=ic::WARNING />
                <span>{move || error.get().unwrap_or_default()}</span>
                <button class=css::retry on:click=move |_| on_retry.run(())>
                    <Icon icon=ic::RETRY />
                    "Retry"
                </button>
            </div>
        </Show>
        <Show
            when=move || !loading.get()
            fallback=|| view! { <div class=css::loading>"Loading..."</div> }
        >
            <Show
                when=move || !empty.get()
                fallback=move || view! { <div class=css::empty>{empty_message.get_value()}</div> }
            >
                {children.with_value(|children| children())}
            </Show>
        </Show>
    }
}
