// Page components
use leptos::*;
use leptos_router::*;

use crate::config::Config;

pub mod users;

pub use users::*;

#[component]
pub fn HomePage() -> impl IntoView {
    let config = expect_context::<Config>();

    view! { <Redirect path=config.listing_route/> }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    let config = expect_context::<Config>();

    view! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-gray-900 mb-4">"404"</h1>
                <h2 class="text-2xl font-semibold text-gray-700 mb-4">
                    "Page not found"
                </h2>
                <p class="text-gray-500 mb-8">
                    "The page you're looking for doesn't exist."
                </p>
                <a href=config.listing_route class="bg-blue-600 hover:bg-blue-700 text-white px-6 py-3 rounded-md font-medium">
                    "Go to Users"
                </a>
            </div>
        </div>
    }
}
