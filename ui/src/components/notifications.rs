// Notification components
use leptos::*;
use std::rc::Rc;
use std::time::Duration;

/// Anything that can show a transient, non-blocking message.
pub trait Notifier {
    fn notify(&self, toast: Toast);
}

impl<T: Notifier + ?Sized> Notifier for Rc<T> {
    fn notify(&self, toast: Toast) {
        (**self).notify(toast)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

impl ToastVariant {
    fn class(self) -> &'static str {
        match self {
            ToastVariant::Default => "toast",
            ToastVariant::Destructive => "toast toast-destructive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn with_variant(mut self, variant: ToastVariant) -> Self {
        self.variant = variant;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastEntry {
    pub id: u64,
    pub toast: Toast,
}

/// Queue of visible toasts, shared through context.
#[derive(Clone, Copy)]
pub struct Toaster {
    toasts: RwSignal<Vec<ToastEntry>>,
    next_id: StoredValue<u64>,
    duration: Duration,
}

impl Toaster {
    pub fn new(duration: Duration) -> Self {
        Self {
            toasts: create_rw_signal(Vec::new()),
            next_id: store_value(0),
            duration,
        }
    }

    /// Adds a toast and returns its id. It stays until dismissed.
    pub fn push(&self, toast: Toast) -> u64 {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.toasts.update(|toasts| toasts.push(ToastEntry { id, toast }));
        id
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|entry| entry.id != id));
    }

    pub fn toasts(&self) -> Vec<ToastEntry> {
        self.toasts.get()
    }
}

impl Notifier for Toaster {
    fn notify(&self, toast: Toast) {
        let id = self.push(toast);
        let toaster = *self;
        let millis = u32::try_from(self.duration.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::callback::Timeout::new(millis, move || toaster.dismiss(id)).forget();
    }
}

pub fn provide_toaster(duration: Duration) -> Toaster {
    let toaster = Toaster::new(duration);
    provide_context(toaster);
    toaster
}

pub fn use_toaster() -> Toaster {
    expect_context::<Toaster>()
}

#[component]
pub fn ToastViewport() -> impl IntoView {
    let toaster = use_toaster();

    view! {
        <ol class="toast-viewport">
            <For
                each=move || toaster.toasts()
                key=|entry| entry.id
                children=move |entry| view! { <ToastItem entry=entry toaster=toaster/> }
            />
        </ol>
    }
}

#[component]
fn ToastItem(entry: ToastEntry, toaster: Toaster) -> impl IntoView {
    let id = entry.id;
    let Toast {
        description,
        variant,
    } = entry.toast;

    view! {
        <li class=variant.class() role="status">
            <div class="toast-body">{description}</div>
            <button
                type="button"
                class="btn-close"
                on:click=move |_| toaster.dismiss(id)
            ></button>
        </li>
    }
}

#[component]
pub fn Alert(
    #[prop(into)] message: String,
    #[prop(into, optional)] alert_type: String,
    #[prop(optional)] dismissible: bool,
) -> impl IntoView {
    let (show, set_show) = create_signal(true);
    let alert_class = format!(
        "alert alert-{}",
        if alert_type.is_empty() { "info" } else { alert_type.as_str() }
    );

    view! {
        <div class=alert_class style:display=move || if show.get() { "block" } else { "none" }>
            {message}
            {dismissible.then(|| view! {
                <button
                    type="button"
                    class="btn-close"
                    on:click=move |_| set_show.set(false)
                ></button>
            })}
        </div>
    }
}
