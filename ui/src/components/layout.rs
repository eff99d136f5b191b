use leptos::*;

use crate::components::notifications::ToastViewport;

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-gray-50">
            <main class="py-10">
                <div class="px-4 sm:px-6 lg:px-8">
                    {children()}
                </div>
            </main>
            <ToastViewport/>
        </div>
    }
}

#[component]
pub fn PageHeader(
    #[prop(into)] title: String,
    #[prop(optional, into)] description: Option<String>,
) -> impl IntoView {
    view! {
        <div class="border-b border-gray-200 pb-5">
            <h1 class="text-2xl font-semibold leading-tight tracking-tight text-gray-900">
                {title}
            </h1>
            {description.map(|desc| view! {
                <p class="mt-2 text-sm text-gray-700">{desc}</p>
            })}
        </div>
    }
}

#[component]
pub fn Card(
    #[prop(optional, into)] class: Option<String>,
    children: Children,
) -> impl IntoView {
    let class = class.unwrap_or_default();

    view! {
        <div class=format!("bg-white overflow-hidden shadow rounded-lg {}", class)>
            <div class="px-4 py-5 sm:p-6">
                {children()}
            </div>
        </div>
    }
}
