//! Root application module.
//!
//! Contains the main App component, the AppContext definition, and the
//! reactive session store the API client reports to.

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{info, warn};

use crate::api::{ApiClient, HttpTransport, QueryClient};
use crate::components::AppRouter;
use crate::components::toast::{ToastKind, Toasts};
use crate::config::API_BASE_URL;
use crate::core::{ApiError, SessionStore};
use crate::models::{AppRoute, ResourceFamily, Session, SessionAction};
use crate::utils::storage;

/// The browser query client.
pub type Client = QueryClient<HttpTransport, SessionSignal>;

// ============================================================================
// Session Store
// ============================================================================

/// Session store over a reactive signal.
///
/// Every dispatched action is reduced into the signal and the result is
/// persisted, so components and storage never disagree.
#[derive(Clone, Copy)]
pub struct SessionSignal(pub RwSignal<Session>);

impl SessionStore for SessionSignal {
    fn snapshot(&self) -> Session {
        self.0.get_untracked()
    }

    fn dispatch(&self, action: SessionAction) {
        self.0
            .update(|session| *session = std::mem::take(session).reduce(action));
        self.0.with_untracked(storage::save_session);
    }
}

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// This context is provided at the root of the component tree and can be
/// accessed from any child component using `use_context::<AppContext>()`.
///
/// # Note
///
/// This struct is `Copy` because all fields are Leptos signals or stored
/// values, which are cheap to copy.
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Session snapshot; write through [`AppContext::session_store`] only.
    pub session: RwSignal<Session>,

    /// Current hash route.
    pub route: RwSignal<AppRoute>,

    /// Transient notifications.
    pub toasts: Toasts,

    /// Bumped whenever cached query state changes.
    pub revision: RwSignal<u64>,

    client: StoredValue<Rc<Client>, LocalStorage>,
}

impl AppContext {
    /// Creates the context, restoring a persisted session if there is one.
    pub fn new() -> Self {
        let restored = storage::load_session();
        let restoring = restored.is_some();
        let session = RwSignal::new(restored.unwrap_or_default());
        let revision = RwSignal::new(0u64);

        let api = ApiClient::new(HttpTransport::new(API_BASE_URL), SessionSignal(session));
        let client = Rc::new(QueryClient::new(api));
        client.set_listener(move || revision.update(|r| *r += 1));

        let ctx = Self {
            session,
            route: RwSignal::new(AppRoute::current()),
            toasts: Toasts::new(),
            revision,
            client: StoredValue::new_local(client),
        };

        if restoring {
            info!("restoring saved session");
            let client = ctx.client();
            spawn_local(async move {
                if let Err(e) = client.api().fetch_profile().await {
                    warn!("session restore failed: {}", e);
                }
            });
        }
        ctx
    }

    pub fn client(&self) -> Rc<Client> {
        self.client.get_value()
    }

    pub fn session_store(&self) -> SessionSignal {
        SessionSignal(self.session)
    }

    /// Navigate to `route`, adding a history entry.
    pub fn navigate(&self, route: AppRoute) {
        route.push();
        self.route.set(route);
    }

    /// Navigate to `route`, replacing the current history entry.
    pub fn redirect(&self, route: AppRoute) {
        route.replace();
        self.route.set(route);
    }

    /// Sign out and return to the login page.
    pub fn logout(&self) {
        let ctx = *self;
        let client = self.client();
        spawn_local(async move {
            client.api().logout().await;
            client.clear();
            ctx.redirect(AppRoute::Login { from: None });
        });
    }

    /// Await a mutation of `family`, reporting the outcome as a toast.
    ///
    /// On success the affected queries are invalidated and `success` is
    /// shown; on failure the server message is shown and the cache is left
    /// alone.
    pub async fn run_mutation<R, Fut>(
        &self,
        family: ResourceFamily,
        success: impl Into<String>,
        request: impl FnOnce(Rc<Client>) -> Fut,
    ) -> Option<R>
    where
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let client = self.client();
        let pending = request(client.clone());
        match client.mutate(family, pending).await {
            Ok(value) => {
                self.toasts.push(ToastKind::Success, success);
                Some(value)
            }
            Err(e) => {
                warn!(family = ?family, "mutation failed: {}", e);
                self.toasts.push(ToastKind::Error, e.message());
                None
            }
        }
    }

    /// Run a mutation in the background; `on_success` runs only if it succeeds.
    pub fn mutate<R, Fut>(
        &self,
        family: ResourceFamily,
        success: impl Into<String>,
        request: impl FnOnce(Rc<Client>) -> Fut + 'static,
        on_success: impl FnOnce(R) + 'static,
    ) where
        R: 'static,
        Fut: Future<Output = Result<R, ApiError>> + 'static,
    {
        let ctx = *self;
        let success = success.into();
        spawn_local(async move {
            if let Some(value) = ctx.run_mutation(family, success, request).await {
                on_success(value);
            }
        });
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Drops cached data whenever the session ends
/// - Wraps the app in an ErrorBoundary for graceful error handling
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    Effect::new(move |was_authenticated: Option<bool>| {
        let authenticated = ctx.session.with(Session::is_authenticated);
        if was_authenticated == Some(true) && !authenticated {
            ctx.client().clear();
        }
        authenticated
    });

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div class="fatal">
                    <h1>"Something went wrong"</h1>
                    <p>"An unexpected error occurred. Please try reloading the page."</p>
                    <details>
                        <summary>"Error details"</summary>
                        <ul>
                            {move || errors.get()
                                .into_iter()
                                .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                                .collect::<Vec<_>>()
                            }
                        </ul>
                    </details>
                    <button on:click=move |_| {
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().reload();
                        }
                    }>
                        "Reload Page"
                    </button>
                </div>
            }
        >
            <AppRouter />
        </ErrorBoundary>
    }
}
