//! Application shell: sidebar navigation and top bar.
//!
//! The sidebar shows the navigation tree filtered for the signed-in role, so
//! a user never sees a link the router would refuse.

use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons::{self as ic, nav_icon};
use crate::config::{self, APP_NAME, APP_VERSION};
use crate::core::filter_menu;
use crate::models::{AppRoute, NavigationEntry, Role};

stylance::import_crate_style!(css, "src/components/layout/layout.module.css");

/// Page chrome around routed content.
#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let display_name = Signal::derive(move || {
        ctx.session.with(|s| {
            s.user
                .as_ref()
                .map(|u| u.display_name().to_string())
                .unwrap_or_default()
        })
    });
    let role_label = Signal::derive(move || {
        ctx.session
            .with(|s| s.role().map(|r| r.label()).unwrap_or_default())
    });

    view! {
        <div class=css::shell>
            <Sidebar />
            <div class=css::main>
                <header class=css::topBar>
                    <span class=css::user>
                        <Icon icon=ic::PROFILE />
                        <span>{display_name}</span>
                        <span class=css::role>{role_label}</span>
                    </span>
                    <button class=css::logout on:click=move |_| ctx.logout()>
                        <Icon icon=ic::LOGOUT />
                        <span>"Sign out"</span>
                    </button>
                </header>
                <main class=css::content>{children()}</main>
            </div>
        </div>
    }
}

/// Role-filtered navigation tree.
#[component]
fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let menu = Memo::new(move |_| {
        let role = ctx.session.with(|s| s.role()).unwrap_or(Role::User);
        filter_menu(&config::navigation(), role)
    });

    view! {
        <nav class=css::sidebar aria-label="Main navigation">
            <a class=css::brand href="#/">
                <Icon icon=ic::DOCUMENTS />
                <span>{APP_NAME}</span>
            </a>
            <ul class=css::menu>
                {move || menu.get().into_iter().map(|entry| view! { <NavItem entry=entry /> }).collect_view()}
            </ul>
            <footer class=css::version>{format!("v{}", APP_VERSION)}</footer>
        </nav>
    }
}

/// One entry; groups render their children and start expanded when they
/// contain the current route.
#[component]
fn NavItem(entry: NavigationEntry) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let icon = nav_icon(entry.icon);

    if entry.has_children() {
        let contains_current = {
            let entry = entry.clone();
            move || {
                let path = ctx.route.with(AppRoute::path);
                entry.walk().any(|e| e.target_path.as_deref().is_some_and(|t| is_active(t, &path)))
            }
        };
        let open = RwSignal::new(contains_current());
        let children = entry.children.clone();
        return view! {
            <li class=css::group>
                <button
                    class=css::groupToggle
                    aria-expanded=move || open.get().to_string()
                    on:click=move |_| open.update(|o| *o = !*o)
                >
                    <Icon icon=icon />
                    <span>{entry.title.clone()}</span>
                    <span class=move || if open.get() { css::chevronOpen } else { css::chevron }>
                        <Icon icon=ic::CHEVRON_DOWN />
                    </span>
                </button>
                <Show when=move || open.get()>
                    <ul class=css::submenu>
                        {children.clone().into_iter().map(|child| view! { <NavItem entry=child /> }).collect_view()}
                    </ul>
                </Show>
            </li>
        }
        .into_any();
    }

    let target = entry.target_path.clone().unwrap_or_else(|| "/".to_string());
    let href = AppRoute::parse(&target).to_hash();
    let class = move || {
        let active = ctx.route.with(|r| is_active(&target, &r.path()));
        if active {
            format!("{} {}", css::link, css::active)
        } else {
            css::link.to_string()
        }
    };

    view! {
        <li>
            <a class=class href=href>
                <Icon icon=icon />
                <span>{entry.title}</span>
            </a>
        </li>
    }
    .into_any()
}

/// Whether a menu link to `target` should be highlighted on `current`.
///
/// Sections own their sub-paths (`/folders` is active on `/folders/abc`);
/// the dashboard is active only on `/`.
fn is_active(target: &str, current: &str) -> bool {
    if target == "/" {
        return current == "/";
    }
    current == target
        || current
            .strip_prefix(target)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active() {
        assert!(is_active("/", "/"));
        assert!(!is_active("/", "/folders"));
        assert!(is_active("/folders", "/folders"));
        assert!(is_active("/folders", "/folders/abc"));
        assert!(!is_active("/folders", "/folders-archive"));
        assert!(!is_active("/files", "/folders"));
    }
}
