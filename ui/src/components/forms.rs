// Form components
use async_trait::async_trait;
use leptos::*;
use std::rc::Rc;

use crate::error::PhotoReadError;
use crate::form::{FieldErrors, PhotoSource};
use crate::types::{Photo, Role};

/// Inline message for one field, read from the form's error map.
pub fn field_error(errors: RwSignal<FieldErrors>, field: &'static str) -> Signal<Option<String>> {
    Signal::derive(move || errors.with(|errors| errors.get(field).map(str::to_owned)))
}

#[component]
pub fn FieldMessage(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    move || {
        error
            .get()
            .map(|message| view! { <p class="form-message">{message}</p> })
    }
}

#[component]
pub fn TextInput(
    #[prop(into)] name: String,
    value: RwSignal<String>,
    #[prop(into)] error: Signal<Option<String>>,
    #[prop(optional, into)] input_type: Option<String>,
    #[prop(optional, into)] placeholder: Option<String>,
) -> impl IntoView {
    view! {
        <div class="form-item">
            <input
                type=input_type.unwrap_or_else(|| "text".to_string())
                class="form-control"
                id=name.clone()
                name=name
                placeholder=placeholder.unwrap_or_default()
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
            <FieldMessage error=error/>
        </div>
    }
}

/// File picker. Opening the dialog and cancelling clears the value, which
/// then fails validation. The file is only read when the form is submitted.
#[component]
pub fn FileInput(
    #[prop(into)] name: String,
    value: RwSignal<Option<Rc<dyn PhotoSource>>>,
    #[prop(into)] error: Signal<Option<String>>,
) -> impl IntoView {
    let on_change = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let picked = input
            .files()
            .and_then(|files| files.get(0))
            .map(|file| Rc::new(PickedFile(file)) as Rc<dyn PhotoSource>);
        value.set(picked);
    };

    view! {
        <div class="form-item">
            <input type="file" class="form-control" id=name.clone() name=name on:change=on_change/>
            <FieldMessage error=error/>
        </div>
    }
}

/// A file chosen in the browser picker, read on demand.
pub struct PickedFile(pub web_sys::File);

#[async_trait(?Send)]
impl PhotoSource for PickedFile {
    async fn read(&self) -> Result<Photo, PhotoReadError> {
        let file = gloo_file::File::from(self.0.clone());
        let bytes = gloo_file::futures::read_as_bytes(&file)
            .await
            .map_err(|err| PhotoReadError(err.to_string()))?;
        let content_type = Some(file.raw_mime_type()).filter(|mime| !mime.is_empty());

        Ok(Photo::new(file.name(), content_type, bytes))
    }
}

/// Single select over [`Role::ALL`].
#[component]
pub fn RoleSelect(
    #[prop(into)] name: String,
    value: RwSignal<Option<String>>,
    #[prop(into)] error: Signal<Option<String>>,
    #[prop(optional, into)] placeholder: Option<String>,
) -> impl IntoView {
    let options = Role::ALL
        .into_iter()
        .map(|role| {
            view! {
                <option
                    value=role.as_str()
                    prop:selected=move || value.with(|v| v.as_deref() == Some(role.as_str()))
                >
                    {role.label()}
                </option>
            }
        })
        .collect_view();

    view! {
        <div class="form-item">
            <select
                class="form-control"
                id=name.clone()
                name=name
                on:change=move |ev| {
                    let selected = event_target_value(&ev);
                    value.set((!selected.is_empty()).then_some(selected));
                }
            >
                <option value="" disabled=true prop:selected=move || value.with(Option::is_none)>
                    {placeholder.unwrap_or_default()}
                </option>
                {options}
            </select>
            <FieldMessage error=error/>
        </div>
    }
}
