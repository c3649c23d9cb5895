use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, warn};

use crate::{
    backend::AdminKey,
    web::{AppState, auth::require_admin_session},
};

use super::{
    dashboard::{DashboardView, admin_error, missing_id, missing_key, respond},
    types::{AdminActionForm, Tab},
};

pub async fn load_contacts(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AdminActionForm>,
) -> Result<Response, Redirect> {
    require_admin_session(&state, &jar).await?;

    let Some(key) = AdminKey::parse(&form.admin_key) else {
        return Ok(missing_key(&state, Tab::Contacts, &form.admin_key));
    };

    match state.backend().list_contacts(&key).await {
        Ok(contacts) => {
            info!(count = contacts.len(), "loaded contact submissions");
            let mut view = DashboardView::new(&form.admin_key, Tab::Contacts);
            view.contacts = Some(contacts);
            Ok(respond(&state, StatusCode::OK, view))
        }
        Err(err) => {
            error!(?err, "failed to list contact submissions");
            Ok(admin_error(&state, Tab::Contacts, &form.admin_key, &err))
        }
    }
}

pub async fn mark_read(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AdminActionForm>,
) -> Result<Response, Redirect> {
    require_admin_session(&state, &jar).await?;

    let Some(key) = AdminKey::parse(&form.admin_key) else {
        return Ok(missing_key(&state, Tab::Contacts, &form.admin_key));
    };
    let Some(id) = form.target_id() else {
        return Ok(missing_id(&state, Tab::Contacts, &form.admin_key));
    };

    let backend = state.backend();
    if let Err(err) = backend.mark_read(&key, id).await {
        error!(?err, contact_id = id, "failed to mark contact submission read");
        return Ok(admin_error(&state, Tab::Contacts, &form.admin_key, &err));
    }

    let mut view = DashboardView::new(&form.admin_key, Tab::Contacts);
    match backend.list_contacts(&key).await {
        Ok(mut contacts) => {
            for contact in contacts.iter_mut().filter(|contact| contact.id == id) {
                contact.read = true;
            }
            view.contacts = Some(contacts);
        }
        Err(err) => warn!(?err, "failed to refresh contact submissions after mark_read"),
    }

    Ok(respond(&state, StatusCode::OK, view))
}
