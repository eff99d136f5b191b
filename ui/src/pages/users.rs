// Users management pages
use leptos::*;
use leptos_router::use_navigate;
use std::rc::Rc;

use crate::api::ApiClient;
use crate::components::buttons::SubmitButton;
use crate::components::forms::{field_error, FileInput, RoleSelect, TextInput};
use crate::components::layout::{Card, PageHeader};
use crate::components::notifications::{use_toaster, Alert};
use crate::config::Config;
use crate::form::{FieldErrors, FormController, SubmitOutcome, UserDraft};
use crate::navigation::RouterNavigator;
use crate::storage::{LocalStore, MessageStore};

/// Listing route. Shows the message left behind by a successful creation,
/// once.
#[component]
pub fn UsersPage() -> impl IntoView {
    let config = expect_context::<Config>();
    let flash = LocalStore.take(&config.flash_key).unwrap_or_else(|err| {
        tracing::warn!(%err, "could not read the flash message");
        None
    });

    view! {
        <div class="space-y-6">
            <PageHeader title="Users"/>
            {flash.map(|message| view! {
                <Alert message=message alert_type="success" dismissible=true/>
            })}
            <Card>
                <a href=config.add_user_route() class="btn btn-primary">"Add User"</a>
            </Card>
        </div>
    }
}

#[component]
pub fn AddUserPage() -> impl IntoView {
    view! {
        <Card>
            <AddUserForm/>
        </Card>
    }
}

#[component]
pub fn AddUserForm() -> impl IntoView {
    let config = expect_context::<Config>();
    let controller = Rc::new(FormController::new(
        &config,
        ApiClient::new(&config),
        LocalStore,
        RouterNavigator::new(use_navigate()),
        use_toaster(),
    ));

    let defaults = UserDraft::default();
    let username = create_rw_signal(defaults.username.unwrap_or_default());
    let email = create_rw_signal(defaults.email.unwrap_or_default());
    let password = create_rw_signal(defaults.password.unwrap_or_default());
    let photo = create_rw_signal(defaults.photo);
    let role = create_rw_signal(defaults.role);
    let errors = create_rw_signal(FieldErrors::default());
    let pending = create_rw_signal(false);
    let submitted = create_rw_signal(false);

    let draft = move || UserDraft {
        username: Some(username.get()),
        email: Some(email.get()),
        password: Some(password.get()),
        photo: photo.get(),
        role: role.get(),
    };

    // Once a submit has been attempted, inline messages follow the fields.
    create_effect(move |_| {
        let current = draft();
        if submitted.get_untracked() {
            errors.set(current.check());
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }

        let draft = untrack(draft);
        let controller = Rc::clone(&controller);
        submitted.set(true);
        pending.set(true);

        spawn_local(async move {
            let outcome = controller.submit_draft(draft).await;
            match outcome {
                SubmitOutcome::Invalid(field_errors) => errors.set(field_errors),
                SubmitOutcome::Busy => {}
                SubmitOutcome::Completed(_) => errors.set(FieldErrors::default()),
            }
            pending.set(controller.is_pending());
        });
    };

    view! {
        <form class="flex flex-col gap-4" on:submit=on_submit>
            <h1 class="text-2xl font-semibold">"Add User"</h1>
            <TextInput
                name="username"
                value=username
                placeholder="Username"
                error=field_error(errors, "username")
            />
            <TextInput
                name="email"
                input_type="email"
                value=email
                placeholder="Email"
                error=field_error(errors, "email")
            />
            <TextInput
                name="password"
                input_type="password"
                value=password
                placeholder="Password"
                error=field_error(errors, "password")
            />
            <FileInput name="photo" value=photo error=field_error(errors, "photo")/>
            <RoleSelect
                name="role"
                value=role
                placeholder="Role"
                error=field_error(errors, "role")
            />
            <SubmitButton text="Submit" pending=pending/>
        </form>
    }
}
