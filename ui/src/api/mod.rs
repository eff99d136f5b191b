// API client for the dashboard backend
use async_trait::async_trait;
use std::rc::Rc;

use crate::config::Config;
use crate::error::ApiError;
use crate::types::{MessageBody, UserCreationRequest};

#[cfg(not(target_arch = "wasm32"))]
use reqwest::multipart::{Form, Part};

#[cfg(target_arch = "wasm32")]
use gloo_net::http::Request;

/// Backend operations the user form depends on.
#[async_trait(?Send)]
pub trait UserGateway {
    async fn create_user(&self, request: &UserCreationRequest) -> Result<MessageBody, ApiError>;
}

#[async_trait(?Send)]
impl<T: UserGateway + ?Sized> UserGateway for Rc<T> {
    async fn create_user(&self, request: &UserCreationRequest) -> Result<MessageBody, ApiError> {
        (**self).create_user(request).await
    }
}

pub struct ApiClient {
    create_user_url: String,
    #[cfg(not(target_arch = "wasm32"))]
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            create_user_url: config.create_user_url(),
            #[cfg(not(target_arch = "wasm32"))]
            client: reqwest::Client::new(),
        }
    }

    pub fn create_user_url(&self) -> &str {
        &self.create_user_url
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn post_multipart(&self, url: &str, form: Form) -> Result<MessageBody, ApiError> {
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::rejected(status.as_u16(), &body));
        }

        Ok(success_body(&body))
    }

    #[cfg(target_arch = "wasm32")]
    async fn post_multipart(&self, url: &str, form: web_sys::FormData) -> Result<MessageBody, ApiError> {
        let response = Request::post(url)
            .body(form)
            .map_err(|e| ApiError::Request(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(ApiError::rejected(status, &body));
        }

        Ok(success_body(&body))
    }
}

#[async_trait(?Send)]
impl UserGateway for ApiClient {
    async fn create_user(&self, request: &UserCreationRequest) -> Result<MessageBody, ApiError> {
        let form = multipart_form(request)?;
        self.post_multipart(&self.create_user_url, form).await
    }
}

// A 2xx means the user exists, whatever the body looks like.
fn success_body(body: &str) -> MessageBody {
    serde_json::from_str(body).unwrap_or_else(|err| {
        tracing::warn!(%err, "success response without a JSON message body");
        MessageBody::default()
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn multipart_form(request: &UserCreationRequest) -> Result<Form, ApiError> {
    let photo = &request.photo;
    let mut part = Part::bytes(photo.bytes.clone()).file_name(photo.file_name.clone());
    if let Some(content_type) = &photo.content_type {
        part = part
            .mime_str(content_type)
            .map_err(|e| ApiError::Request(e.to_string()))?;
    }

    Ok(Form::new()
        .text("username", request.username.clone())
        .text("email", request.email.clone())
        .text("password", request.password.clone())
        .part("photo", part)
        .text("role", request.role.as_str()))
}

#[cfg(target_arch = "wasm32")]
fn multipart_form(request: &UserCreationRequest) -> Result<web_sys::FormData, ApiError> {
    let js_error = |e: wasm_bindgen::JsValue| ApiError::Request(format!("{e:?}"));

    let photo = &request.photo;
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(photo.bytes.as_slice()));
    let options = web_sys::BlobPropertyBag::new();
    if let Some(content_type) = &photo.content_type {
        options.set_type(content_type);
    }
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;

    let form = web_sys::FormData::new().map_err(js_error)?;
    form.append_with_str("username", &request.username).map_err(js_error)?;
    form.append_with_str("email", &request.email).map_err(js_error)?;
    form.append_with_str("password", &request.password).map_err(js_error)?;
    form.append_with_blob_and_filename("photo", &blob, &photo.file_name)
        .map_err(js_error)?;
    form.append_with_str("role", request.role.as_str()).map_err(js_error)?;

    Ok(form)
}
