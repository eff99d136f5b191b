//! Add-user form state, schema validation and the submission flow.
//!
//! The view layer only binds signals to a [`UserDraft`] and hands it to a
//! [`FormController`]; everything that decides what happens on submit lives
//! here so it can run without a browser.

use async_trait::async_trait;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{debug, info, warn};
use validator::{Validate, ValidationErrors};

use crate::api::UserGateway;
use crate::components::notifications::{Notifier, Toast};
use crate::config::Config;
use crate::error::{ApiError, PhotoReadError};
use crate::navigation::Navigator;
use crate::storage::MessageStore;
use crate::types::{MessageBody, Photo, Role, SubmissionResult, UserCreationRequest};

pub const REQUIRED_MESSAGE: &str = "Required";
pub const NOT_A_FILE_MESSAGE: &str = "Input not instance of File";
pub const INVALID_ROLE_MESSAGE: &str =
    "Invalid enum value. Expected 'user' | 'admin' | 'receptionist'";

/// Raw field values as the controls hold them. `None` means the control
/// currently has no value at all, which only the file picker (dismissed)
/// and the role select (cleared) can produce in the browser.
#[derive(Clone, PartialEq, Eq, Validate)]
pub struct UserForm {
    #[validate(required(message = "Required"))]
    pub username: Option<String>,
    #[validate(required(message = "Required"))]
    pub email: Option<String>,
    #[validate(required(message = "Required"))]
    pub password: Option<String>,
    #[validate(required(message = "Input not instance of File"))]
    pub photo: Option<Photo>,
    #[validate(required(message = "Required"))]
    pub role: Option<String>,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            username: Some(String::new()),
            email: Some(String::new()),
            password: Some(String::new()),
            photo: Some(Photo::default()),
            role: Some(Role::default().as_str().to_string()),
        }
    }
}

impl UserForm {
    /// Shape check only: every field present, role one of [`Role::ALL`].
    /// Empty strings pass.
    pub fn validate_shape(&self) -> Result<UserCreationRequest, FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::default(),
            Err(errors) => FieldErrors::from(&errors),
        };

        let role = match self.role.as_deref().map(str::parse::<Role>) {
            Some(Ok(role)) => Some(role),
            Some(Err(_)) => {
                errors.insert("role", INVALID_ROLE_MESSAGE);
                None
            }
            None => None,
        };

        match (&self.username, &self.email, &self.password, &self.photo, role) {
            (Some(username), Some(email), Some(password), Some(photo), Some(role))
                if errors.is_empty() =>
            {
                Ok(UserCreationRequest {
                    username: username.clone(),
                    email: email.clone(),
                    password: password.clone(),
                    photo: photo.clone(),
                    role,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Where a picked photo's bytes come from. The browser file picker hands
/// over a file handle whose contents are only read on submit.
#[async_trait(?Send)]
pub trait PhotoSource {
    async fn read(&self) -> Result<Photo, PhotoReadError>;
}

#[async_trait(?Send)]
impl PhotoSource for Photo {
    async fn read(&self) -> Result<Photo, PhotoReadError> {
        Ok(self.clone())
    }
}

/// Field values as the controls hold them between submissions.
#[derive(Clone)]
pub struct UserDraft {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub photo: Option<Rc<dyn PhotoSource>>,
    pub role: Option<String>,
}

impl Default for UserDraft {
    fn default() -> Self {
        let form = UserForm::default();
        Self {
            username: form.username,
            email: form.email,
            password: form.password,
            photo: form
                .photo
                .map(|photo| Rc::new(photo) as Rc<dyn PhotoSource>),
            role: form.role,
        }
    }
}

impl UserDraft {
    /// Shape errors of the current values. The photo only counts as present
    /// here; its contents are not read.
    pub fn check(&self) -> FieldErrors {
        let form = UserForm {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            photo: self.photo.as_ref().map(|_| Photo::default()),
            role: self.role.clone(),
        };
        form.validate_shape().err().unwrap_or_default()
    }

    /// Reads the photo and produces the form to submit.
    pub async fn resolve(self) -> Result<UserForm, FieldErrors> {
        let photo = match &self.photo {
            Some(source) => match source.read().await {
                Ok(photo) => Some(photo),
                Err(err) => {
                    let mut errors = FieldErrors::default();
                    errors.insert("photo", err.to_string());
                    return Err(errors);
                }
            },
            None => None,
        };

        Ok(UserForm {
            username: self.username,
            email: self.email,
            password: self.password,
            photo,
            role: self.role,
        })
    }
}

/// One inline message per field, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Keeps the first message recorded for a field.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut fields = FieldErrors::default();
        for (field, field_errors) in errors.field_errors() {
            if let Some(error) = field_errors.first() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| REQUIRED_MESSAGE.to_string());
                fields.insert(&field.to_string(), message);
            }
        }
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// A submission was already in flight; nothing was sent.
    Busy,
    /// The request went out and this is how it ended.
    Completed(SubmissionResult),
}

pub struct FormController<G, S, N, T> {
    gateway: G,
    store: S,
    navigator: N,
    notifier: T,
    listing_route: String,
    flash_key: String,
    phase: Cell<FormPhase>,
}

impl<G, S, N, T> FormController<G, S, N, T>
where
    G: UserGateway,
    S: MessageStore,
    N: Navigator,
    T: Notifier,
{
    pub fn new(config: &Config, gateway: G, store: S, navigator: N, notifier: T) -> Self {
        Self {
            gateway,
            store,
            navigator,
            notifier,
            listing_route: config.listing_route.clone(),
            flash_key: config.flash_key.clone(),
            phase: Cell::new(FormPhase::Idle),
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase.get()
    }

    pub fn is_pending(&self) -> bool {
        self.phase.get() == FormPhase::Submitting
    }

    pub async fn submit(&self, form: &UserForm) -> SubmitOutcome {
        if self.phase.get() != FormPhase::Idle {
            debug!("submission already in flight, ignoring");
            return SubmitOutcome::Busy;
        }

        self.phase.set(FormPhase::Validating);
        let request = match form.validate_shape() {
            Ok(request) => request,
            Err(errors) => {
                self.phase.set(FormPhase::Idle);
                debug!(fields = errors.len(), "user form failed validation");
                return SubmitOutcome::Invalid(errors);
            }
        };

        self.phase.set(FormPhase::Submitting);
        info!(username = %request.username, role = %request.role, "creating user");
        let response = self.gateway.create_user(&request).await;
        self.phase.set(FormPhase::Idle);

        let result = match response {
            Ok(body) => self.on_created(body),
            Err(err) => self.on_failed(&err),
        };
        SubmitOutcome::Completed(result)
    }

    /// Submits a draft, reading the picked photo first. The controller
    /// counts as busy while the read is in progress.
    pub async fn submit_draft(&self, draft: UserDraft) -> SubmitOutcome {
        if self.phase.get() != FormPhase::Idle {
            debug!("submission already in flight, ignoring");
            return SubmitOutcome::Busy;
        }

        self.phase.set(FormPhase::Validating);
        let form = draft.resolve().await;
        self.phase.set(FormPhase::Idle);

        match form {
            Ok(form) => self.submit(&form).await,
            Err(errors) => {
                warn!("could not read the selected photo");
                SubmitOutcome::Invalid(errors)
            }
        }
    }

    fn on_created(&self, body: MessageBody) -> SubmissionResult {
        if let Some(message) = &body.message {
            if let Err(err) = self.store.set(&self.flash_key, message) {
                warn!(%err, "could not keep the success message for the listing page");
            }
        }
        self.navigator.navigate(&self.listing_route);

        SubmissionResult::Created {
            message: body.message,
        }
    }

    fn on_failed(&self, err: &ApiError) -> SubmissionResult {
        warn!(%err, "user creation failed");
        let message = err.user_message();
        self.notifier.notify(Toast::new(message.clone()));

        SubmissionResult::Failed { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::notifications::ToastVariant;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeGateway {
        reply: Result<MessageBody, ApiError>,
        received: RefCell<Vec<UserCreationRequest>>,
    }

    impl FakeGateway {
        fn replying(reply: Result<MessageBody, ApiError>) -> Rc<Self> {
            Rc::new(Self {
                reply,
                received: RefCell::new(Vec::new()),
            })
        }
    }

    #[async_trait(?Send)]
    impl UserGateway for FakeGateway {
        async fn create_user(&self, request: &UserCreationRequest) -> Result<MessageBody, ApiError> {
            self.received.borrow_mut().push(request.clone());
            tokio::task::yield_now().await;
            self.reply.clone()
        }
    }

    #[derive(Default)]
    struct RecordingNavigator(RefCell<Vec<String>>);

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: &str) {
            self.0.borrow_mut().push(route.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(RefCell<Vec<Toast>>);

    impl Notifier for RecordingNotifier {
        fn notify(&self, toast: Toast) {
            self.0.borrow_mut().push(toast);
        }
    }

    struct Harness {
        gateway: Rc<FakeGateway>,
        store: Rc<MemoryStore>,
        navigator: Rc<RecordingNavigator>,
        notifier: Rc<RecordingNotifier>,
        controller: FormController<
            Rc<FakeGateway>,
            Rc<MemoryStore>,
            Rc<RecordingNavigator>,
            Rc<RecordingNotifier>,
        >,
    }

    fn harness(reply: Result<MessageBody, ApiError>) -> Harness {
        let gateway = FakeGateway::replying(reply);
        let store = Rc::new(MemoryStore::default());
        let navigator = Rc::new(RecordingNavigator::default());
        let notifier = Rc::new(RecordingNotifier::default());
        let controller = FormController::new(
            &Config::default(),
            gateway.clone(),
            store.clone(),
            navigator.clone(),
            notifier.clone(),
        );
        Harness {
            gateway,
            store,
            navigator,
            notifier,
            controller,
        }
    }

    fn filled_form() -> UserForm {
        UserForm {
            username: Some("jdoe".to_string()),
            email: Some("jdoe@example.com".to_string()),
            password: Some("s3cret".to_string()),
            photo: Some(Photo::new("me.png", Some("image/png".to_string()), vec![1, 2, 3])),
            role: Some("admin".to_string()),
        }
    }

    fn created(message: &str) -> Result<MessageBody, ApiError> {
        Ok(MessageBody {
            message: Some(message.to_string()),
        })
    }

    #[test]
    fn test_blank_form_passes_shape_validation() {
        let request = UserForm::default().validate_shape().unwrap();
        assert_eq!(request.username, "");
        assert_eq!(request.email, "");
        assert_eq!(request.password, "");
        assert!(request.photo.is_placeholder());
        assert_eq!(request.role, Role::User);
    }

    #[test]
    fn test_absent_fields_get_inline_messages() {
        let form = UserForm {
            username: None,
            email: None,
            password: None,
            photo: None,
            role: None,
        };
        let errors = form.validate_shape().unwrap_err();

        assert_eq!(errors.len(), 5);
        for field in ["username", "email", "password", "role"] {
            assert_eq!(errors.get(field), Some(REQUIRED_MESSAGE), "{field}");
        }
        assert_eq!(errors.get("photo"), Some(NOT_A_FILE_MESSAGE));
    }

    #[test]
    fn test_dismissed_file_picker_blocks_only_photo() {
        let form = UserForm {
            photo: None,
            ..filled_form()
        };
        let errors = form.validate_shape().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("photo"), Some(NOT_A_FILE_MESSAGE));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let form = UserForm {
            role: Some("superuser".to_string()),
            ..filled_form()
        };
        let errors = form.validate_shape().unwrap_err();
        assert_eq!(errors.get("role"), Some(INVALID_ROLE_MESSAGE));
    }

    #[tokio::test]
    async fn test_success_stores_flash_and_navigates_once() {
        let h = harness(created("User created"));

        let outcome = h.controller.submit(&filled_form()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Completed(SubmissionResult::Created {
                message: Some("User created".to_string())
            })
        );
        assert_eq!(h.store.get("message").unwrap().as_deref(), Some("User created"));
        assert_eq!(*h.navigator.0.borrow(), vec!["/dashboard/user".to_string()]);
        assert!(h.notifier.0.borrow().is_empty());
        assert_eq!(h.controller.phase(), FormPhase::Idle);
    }

    #[tokio::test]
    async fn test_success_without_message_still_navigates() {
        let h = harness(Ok(MessageBody::default()));

        h.controller.submit(&filled_form()).await;

        assert_eq!(h.store.get("message").unwrap(), None);
        assert_eq!(h.navigator.0.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_rejection_shows_server_message_without_navigation() {
        let h = harness(Err(ApiError::Rejected {
            status: 409,
            message: Some("Email already exists".to_string()),
        }));

        let outcome = h.controller.submit(&filled_form()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Completed(SubmissionResult::Failed {
                message: "Email already exists".to_string()
            })
        );
        let toasts = h.notifier.0.borrow();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].description, "Email already exists");
        assert_eq!(toasts[0].variant, ToastVariant::Default);
        assert!(h.navigator.0.borrow().is_empty());
        assert_eq!(h.store.get("message").unwrap(), None);
        assert_eq!(h.controller.phase(), FormPhase::Idle);
    }

    #[tokio::test]
    async fn test_network_failure_uses_generic_message() {
        let h = harness(Err(ApiError::Network("connection refused".to_string())));

        h.controller.submit(&filled_form()).await;

        let toasts = h.notifier.0.borrow();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].description, crate::error::GENERIC_ERROR_MESSAGE);
        assert!(h.navigator.0.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let h = harness(created("User created"));
        let form = UserForm {
            photo: None,
            ..filled_form()
        };

        let outcome = h.controller.submit(&form).await;

        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert!(h.gateway.received.borrow().is_empty());
        assert!(h.navigator.0.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_default_role_and_selected_role_reach_gateway() {
        let h = harness(created("ok"));

        h.controller.submit(&UserForm::default()).await;
        h.controller.submit(&filled_form()).await;

        let received = h.gateway.received.borrow();
        assert_eq!(received[0].role, Role::User);
        assert_eq!(received[1].role, Role::Admin);
        assert_eq!(received[1].photo.bytes, vec![1, 2, 3]);
    }

    struct SlowPhoto {
        photo: Result<Photo, PhotoReadError>,
    }

    #[async_trait(?Send)]
    impl PhotoSource for SlowPhoto {
        async fn read(&self) -> Result<Photo, PhotoReadError> {
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            self.photo.clone()
        }
    }

    fn draft_with(source: SlowPhoto) -> UserDraft {
        UserDraft {
            username: Some("jdoe".to_string()),
            email: Some("jdoe@example.com".to_string()),
            password: Some("s3cret".to_string()),
            photo: Some(Rc::new(source)),
            role: Some("user".to_string()),
        }
    }

    #[tokio::test]
    async fn test_picked_photo_is_read_before_sending() {
        let h = harness(created("User created"));
        let draft = draft_with(SlowPhoto {
            photo: Ok(Photo::new("me.jpg", Some("image/jpeg".to_string()), vec![0xff, 0xd8, 0xff])),
        });

        let (first, second) = tokio::join!(
            h.controller.submit_draft(draft.clone()),
            h.controller.submit_draft(draft)
        );

        assert!(matches!(first, SubmitOutcome::Completed(_)));
        assert_eq!(second, SubmitOutcome::Busy);
        let received = h.gateway.received.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].photo.file_name, "me.jpg");
        assert_eq!(received[0].photo.bytes, vec![0xff, 0xd8, 0xff]);
    }

    #[tokio::test]
    async fn test_unreadable_photo_blocks_submit() {
        let h = harness(created("User created"));
        let draft = draft_with(SlowPhoto {
            photo: Err(PhotoReadError("aborted".to_string())),
        });

        let outcome = h.controller.submit_draft(draft).await;

        let SubmitOutcome::Invalid(errors) = &outcome else {
            panic!("expected inline errors, got {outcome:?}");
        };
        assert_eq!(
            errors.get("photo"),
            Some("could not read the selected file: aborted")
        );
        assert!(h.gateway.received.borrow().is_empty());
        assert_eq!(h.controller.phase(), FormPhase::Idle);
    }

    #[test]
    fn test_check_follows_field_changes() {
        let mut draft = UserDraft {
            photo: None,
            ..UserDraft::default()
        };
        assert_eq!(draft.check().get("photo"), Some(NOT_A_FILE_MESSAGE));

        draft.photo = Some(Rc::new(Photo::new("me.png", None, vec![1])));
        assert!(draft.check().is_empty());

        draft.role = None;
        assert_eq!(draft.check().get("role"), Some(REQUIRED_MESSAGE));
    }

    #[tokio::test]
    async fn test_overlapping_submit_is_refused() {
        let h = harness(created("User created"));
        let form = filled_form();

        let (first, second) = tokio::join!(h.controller.submit(&form), h.controller.submit(&form));

        assert!(matches!(first, SubmitOutcome::Completed(_)));
        assert_eq!(second, SubmitOutcome::Busy);
        assert_eq!(h.gateway.received.borrow().len(), 1);
        assert_eq!(h.navigator.0.borrow().len(), 1);
    }
}
