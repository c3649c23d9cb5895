use axum::{
    Json,
    extract::{Form, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::{
    backend::NewContact,
    web::{ApiMessage, AppState, Flash, json_message, landing},
};

pub const NAME_MAX_CHARS: usize = 100;
pub const CONTACT_MAX_CHARS: usize = 200;
pub const DETAILS_MAX_CHARS: usize = 2000;

const SEND_FAILED: &str = "Failed to send message. Please try again.";

/// Raw contact form values as posted by the visitor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactValidationError {
    MissingFields,
    TooLong,
}

impl ContactValidationError {
    pub fn title(self) -> &'static str {
        match self {
            ContactValidationError::MissingFields => "Missing fields",
            ContactValidationError::TooLong => "Input too long",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ContactValidationError::MissingFields => "Please fill in all fields.",
            ContactValidationError::TooLong => "Please shorten your input.",
        }
    }

    fn flash(self) -> Flash {
        Flash::error(self.title(), self.description())
    }
}

impl ContactForm {
    /// Emptiness is judged on trimmed values, length limits on the raw input.
    /// Lengths are UTF-16 code units, the unit a browser's `maxlength` counts.
    pub fn validate(&self) -> Result<NewContact, ContactValidationError> {
        let name = self.name.trim();
        let contact = self.contact.trim();
        let details = self.details.trim();

        if name.is_empty() || contact.is_empty() || details.is_empty() {
            return Err(ContactValidationError::MissingFields);
        }

        if self.name.encode_utf16().count() > NAME_MAX_CHARS
            || self.contact.encode_utf16().count() > CONTACT_MAX_CHARS
            || self.details.encode_utf16().count() > DETAILS_MAX_CHARS
        {
            return Err(ContactValidationError::TooLong);
        }

        Ok(NewContact {
            name: name.to_string(),
            contact: contact.to_string(),
            details: details.to_string(),
        })
    }
}

pub async fn submit(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Response {
    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(reason) => {
            let html = landing::render_for_state(&state, &form, Some(&reason.flash())).await;
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response();
        }
    };

    match state.backend().insert_contact(&submission).await {
        Ok(()) => {
            info!("contact submission received");
            Redirect::to("/?status=sent#contact").into_response()
        }
        Err(err) => {
            error!(?err, "failed to store contact submission");
            let flash = Flash::error("Error", backend_message(&err));
            let html = landing::render_for_state(&state, &form, Some(&flash)).await;
            (StatusCode::BAD_GATEWAY, Html(html)).into_response()
        }
    }
}

pub async fn submit_json(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> (StatusCode, Json<ApiMessage>) {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => {
            debug!(%rejection, "rejected contact payload");
            return json_message(rejection.status(), rejection.body_text());
        }
    };

    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(reason) => {
            return json_message(StatusCode::UNPROCESSABLE_ENTITY, reason.description());
        }
    };

    match state.backend().insert_contact(&submission).await {
        Ok(()) => {
            info!("contact submission received");
            json_message(
                StatusCode::CREATED,
                "Thanks for reaching out. I'll get back to you soon.",
            )
        }
        Err(err) => {
            error!(?err, "failed to store contact submission");
            json_message(StatusCode::BAD_GATEWAY, backend_message(&err))
        }
    }
}

fn backend_message(err: &anyhow::Error) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        SEND_FAILED.to_string()
    } else {
        message
    }
}
