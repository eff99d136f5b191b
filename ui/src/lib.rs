// Dashboard UI - user management interface
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod form;
pub mod navigation;
pub mod pages;
pub mod storage;
pub mod types;

use components::layout::Layout;
use components::notifications::provide_toaster;
use config::Config;
use pages::*;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = Config::from_env().unwrap_or_else(|err| {
        tracing::warn!(%err, "falling back to the default configuration");
        Config::default()
    });
    provide_toaster(config.toast_duration);
    let listing_route = config.listing_route.clone();
    let add_user_route = config.add_user_route();
    provide_context(config);

    view! {
        <Stylesheet id="leptos" href="/pkg/dashboard-ui.css"/>
        <Title text="Dashboard - Users"/>
        <Meta name="viewport" content="width=device-width, initial-scale=1"/>

        <Router>
            <Layout>
                <Routes>
                    <Route path="/" view=HomePage/>

                    // User Management
                    <Route path=listing_route view=UsersPage/>
                    <Route path=add_user_route view=AddUserPage/>

                    // 404 fallback
                    <Route path="/*any" view=NotFoundPage/>
                </Routes>
            </Layout>
        </Router>
    }
}

// Mount the app for client-side rendering
#[cfg(all(feature = "csr", target_arch = "wasm32"))]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    leptos::mount_to_body(App);
}
