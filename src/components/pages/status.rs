use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::models::AppRoute;

stylance::import_crate_style!(css, "src/components/pages/pages.module.css");

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    view! {
        <section class=css::status>
            <Icon icon=ic::ADMIN />
            <h1>"Access denied"</h1>
            <p class=css::muted>"Your account does not have permission to view that page."</p>
            <button class=css::primary on:click=move |_| ctx.navigate(AppRoute::Dashboard)>
                <Icon icon=ic::HOME />
                "Back to dashboard"
            </button>
        </section>
    }
}

#[component]
pub fn NotFoundPage(path: String) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    view! {
        <section class=css::status>
            <Icon icon=ic::WARNING />
            <h1>"Page not found"</h1>
            <p class=css::muted>{format!("Nothing lives at {}.", path)}</p>
            <button class=css::primary on:click=move |_| ctx.navigate(AppRoute::Dashboard)>
                <Icon icon=ic::HOME />
                "Back to dashboard"
            </button>
        </section>
    }
}
