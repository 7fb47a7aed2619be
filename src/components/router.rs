//! Application router component.
//!
//! Hash-based routing on native `hashchange` events. Every transition goes
//! through the access policy before anything is rendered.
//!
//! # Architecture
//!
//! - **URL hash is the source of truth**: `ctx.route` follows `#/path`
//! - **Guard first**: the policy decides render, loading, or redirect
//! - **Redirects replace history**: Back never lands on a refused page
//! - **Login stands alone**: only signed-in pages get the sidebar layout

use leptos::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::Closure;

use crate::app::AppContext;
use crate::components::layout::Layout;
use crate::components::pages::{
    ActivitiesPage, DashboardPage, EventsPage, FilesPage, FolderPage, FoldersPage, LoginPage,
    NotFoundPage, ProfilePage, UnauthorizedPage, UsersPage,
};
use crate::components::toast::ToastHost;
use crate::config::{self, APP_NAME};
use crate::core::{GuardInput, GuardOutcome};
use crate::models::AppRoute;
use crate::utils::dom;

// ============================================================================
// Main Router
// ============================================================================

/// Main application router.
///
/// - `#/login` → Login (public)
/// - `#/`, `#/folders`, `#/folders/:id`, `#/files`, `#/events`, `#/profile` → any signed-in user
/// - `#/users`, `#/activities` → administrators
#[component]
pub fn AppRouter() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let route = ctx.route;

    // Set up hashchange event listener (runs once on mount)
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        let closure = Closure::wrap(Box::new(move || {
            route.set(AppRoute::current());
        }) as Box<dyn Fn()>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        }

        // Keep the closure alive for the lifetime of the app
        closure.forget();
    }

    let policy = StoredValue::new(config::access_policy());
    let outcome = Memo::new(move |_| {
        let input = ctx.session.with(|s| GuardInput::from(s));
        let path = route.with(AppRoute::path);
        policy.with_value(|p| p.evaluate(input, &path))
    });

    // Redirects
    Effect::new(move |_| match outcome.get() {
        GuardOutcome::RedirectToLogin { from, .. } => {
            ctx.redirect(AppRoute::login_from(&from));
        }
        GuardOutcome::RedirectUnauthorized => {
            ctx.redirect(AppRoute::Unauthorized);
        }
        GuardOutcome::Render | GuardOutcome::Loading => {
            // A signed-in user has no business on the login page.
            let authenticated = ctx.session.with(|s| s.is_authenticated() && !s.is_loading);
            if authenticated && let AppRoute::Login { from } = route.get() {
                let target = from.map(|f| AppRoute::parse(&f)).unwrap_or(AppRoute::Dashboard);
                ctx.redirect(target);
            }
        }
    });

    Effect::new(move |_| {
        let title = page_title(&route.get());
        dom::set_title(&format!("{} · {}", title, APP_NAME));
    });

    view! {
        {move || match outcome.get() {
            GuardOutcome::Render => render(route.get()),
            GuardOutcome::Loading => view! { <div class="boot">"Loading..."</div> }.into_any(),
            // The redirect effect is already on its way.
            _ => ().into_any(),
        }}
        <ToastHost />
    }
}

fn render(route: AppRoute) -> AnyView {
    let page = match route {
        AppRoute::Login { from } => return view! { <LoginPage from=from /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Folders => view! { <FoldersPage /> }.into_any(),
        AppRoute::Folder { id } => view! { <FolderPage id=id /> }.into_any(),
        AppRoute::Files => view! { <FilesPage /> }.into_any(),
        AppRoute::Users => view! { <UsersPage /> }.into_any(),
        AppRoute::Activities => view! { <ActivitiesPage /> }.into_any(),
        AppRoute::Events => view! { <EventsPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Unauthorized => view! { <UnauthorizedPage /> }.into_any(),
        AppRoute::NotFound(path) => view! { <NotFoundPage path=path /> }.into_any(),
    };
    view! { <Layout>{page}</Layout> }.into_any()
}

/// Document title for a route.
fn page_title(route: &AppRoute) -> &'static str {
    match route {
        AppRoute::Dashboard => "Dashboard",
        AppRoute::Login { .. } => "Sign in",
        AppRoute::Unauthorized => "Access denied",
        AppRoute::Folders | AppRoute::Folder { .. } => "Folders",
        AppRoute::Files => "Files",
        AppRoute::Users => "Users",
        AppRoute::Activities => "Activity Log",
        AppRoute::Events => "Calendar",
        AppRoute::Profile => "Profile",
        AppRoute::NotFound(_) => "Not found",
    }
}
