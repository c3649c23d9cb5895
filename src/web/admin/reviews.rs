use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, warn};

use crate::{
    backend::AdminKey,
    web::{AppState, Flash, auth::require_admin_session},
};

use super::{
    dashboard::{DashboardView, admin_error, missing_id, missing_key, respond},
    types::{AdminActionForm, Tab},
};

#[derive(Clone, Copy)]
enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn as_str(self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }

    fn flash(self) -> Flash {
        match self {
            Decision::Approve => Flash::success("Approved", "Review is now public."),
            Decision::Reject => Flash::success("Rejected", "Review has been deleted."),
        }
    }
}

pub async fn load_pending(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AdminActionForm>,
) -> Result<Response, Redirect> {
    require_admin_session(&state, &jar).await?;

    let Some(key) = AdminKey::parse(&form.admin_key) else {
        return Ok(missing_key(&state, Tab::Reviews, &form.admin_key));
    };

    match state.backend().list_pending(&key).await {
        Ok(reviews) => {
            info!(count = reviews.len(), "loaded pending reviews");
            let mut view = DashboardView::new(&form.admin_key, Tab::Reviews);
            view.reviews = Some(reviews);
            Ok(respond(&state, StatusCode::OK, view))
        }
        Err(err) => {
            error!(?err, "failed to list pending reviews");
            Ok(admin_error(&state, Tab::Reviews, &form.admin_key, &err))
        }
    }
}

pub async fn approve_review(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AdminActionForm>,
) -> Result<Response, Redirect> {
    require_admin_session(&state, &jar).await?;
    Ok(moderate(&state, &form, Decision::Approve).await)
}

pub async fn reject_review(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AdminActionForm>,
) -> Result<Response, Redirect> {
    require_admin_session(&state, &jar).await?;
    Ok(moderate(&state, &form, Decision::Reject).await)
}

async fn moderate(
    state: &AppState,
    form: &AdminActionForm,
    decision: Decision,
) -> Response {
    let Some(key) = AdminKey::parse(&form.admin_key) else {
        return missing_key(state, Tab::Reviews, &form.admin_key);
    };
    let Some(id) = form.target_id() else {
        return missing_id(state, Tab::Reviews, &form.admin_key);
    };

    let backend = state.backend();
    let outcome = match decision {
        Decision::Approve => backend.approve(&key, id).await,
        Decision::Reject => backend.reject(&key, id).await,
    };
    if let Err(err) = outcome {
        error!(?err, review_id = id, action = decision.as_str(), "review moderation failed");
        return admin_error(state, Tab::Reviews, &form.admin_key, &err);
    }
    info!(review_id = id, action = decision.as_str(), "review moderated");

    let mut view = DashboardView::new(&form.admin_key, Tab::Reviews).with_flash(decision.flash());
    match backend.list_pending(&key).await {
        Ok(mut reviews) => {
            reviews.retain(|review| review.id != id);
            view.reviews = Some(reviews);
        }
        Err(err) => warn!(?err, "failed to refresh pending reviews after moderation"),
    }

    respond(state, StatusCode::OK, view)
}
