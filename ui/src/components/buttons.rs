// Button components
use leptos::*;

/// Form submit button, disabled while `pending` is set.
#[component]
pub fn SubmitButton(
    #[prop(into)] text: String,
    #[prop(into)] pending: Signal<bool>,
) -> impl IntoView {
    view! {
        <button
            type="submit"
            class="btn btn-primary"
            disabled=move || pending.get()
        >
            {text}
        </button>
    }
}
