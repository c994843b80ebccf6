use crate::{
    auth::{guard::ActiveSession, janitor::forget_rejected_sessions},
    error::{KampusError, KampusResult},
    maud_conveniences::{alert, title, total_card},
    routes::{
        faculty::{
            delete_faculty, get_create_faculty, get_edit_faculty, get_faculty,
            internal_get_faculty, post_create_faculty, post_edit_faculty,
        },
        index::get_index_route,
        login::{get_login, post_login, post_logout},
        students::{
            delete_student, get_create_student, get_edit_student, get_students,
            internal_get_students, post_create_student, post_edit_student,
        },
    },
    state::KampusState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use maud::{Markup, html};
use serde::Deserialize;
use tower_http::{compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::time::Duration};

pub mod faculty;
pub mod index;
pub mod login;
pub mod students;

#[cfg(test)]
mod tests;

pub const LOAD_FAILED: &str = "Gagal mengambil data. Pastikan koneksi aman.";

pub fn router(state: KampusState) -> Router {
    let config = state.config().clone();

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.secure_cookies())
        .with_expiry(Expiry::OnInactivity(Duration::days(config.session_days())));

    Router::new()
        .route("/", get(get_index_route))
        .route("/login", get(get_login).post(post_login))
        .route("/logout", post(post_logout))
        .route("/dashboard", get(get_students))
        .route("/internal/students", get(internal_get_students))
        .route(
            "/dashboard/create",
            get(get_create_student).post(post_create_student),
        )
        .route(
            "/dashboard/edit/{id}",
            get(get_edit_student).post(post_edit_student),
        )
        .route("/dashboard/delete/{id}", delete(delete_student))
        .route("/dashboard/dosen", get(get_faculty))
        .route("/internal/faculty", get(internal_get_faculty))
        .route(
            "/dashboard/dosen/create",
            get(get_create_faculty).post(post_create_faculty),
        )
        .route(
            "/dashboard/dosen/edit/{id}",
            get(get_edit_faculty).post(post_edit_faculty),
        )
        .route("/dashboard/dosen/delete/{id}", delete(delete_faculty))
        .layer(middleware::from_fn(forget_rejected_sessions))
        .layer(session_layer)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Lifts a rejected session out of `result` so it can end the request; every
/// other failure stays inside and is shown in the current view.
pub fn within_view<T>(result: KampusResult<T>) -> KampusResult<KampusResult<T>> {
    match result {
        Err(KampusError::Unauthorized) => Err(KampusError::Unauthorized),
        other => Ok(other),
    }
}

pub fn failure_status(e: &KampusError) -> StatusCode {
    match e {
        KampusError::Api { status, .. } => *status,
        KampusError::Transport { .. } | KampusError::DecodeBody { .. } => StatusCode::BAD_GATEWAY,
        KampusError::InvalidFormField { .. } | KampusError::InvalidAttachment => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Redrawing a rejected form refetches its lookups only when the API answered;
/// after a transport failure that call would just wait out the timeout again.
pub const fn worth_refetching(e: &KampusError) -> bool {
    !matches!(e, KampusError::Transport { .. })
}

#[derive(Deserialize)]
pub struct DeleteOptions {
    pub total: Option<usize>,
}

/// Body for a deleted row: nothing to swap in, so the row goes, plus the
/// lowered count card out of band when the page sent its current total.
pub fn row_deleted(card_id: &str, label: &str, total: Option<usize>) -> Markup {
    html! {
        @if let Some(total) = total {
            (total_card(card_id, label, total.saturating_sub(1), true))
        }
    }
}

/// A failed delete leaves its row alone and shows the reason in `#flash`.
pub fn delete_failed(e: &KampusError) -> Response {
    (
        [("HX-Retarget", "#flash"), ("HX-Reswap", "innerHTML")],
        alert(e.user_message()),
    )
        .into_response()
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Tab {
    Students,
    Faculty,
}

pub fn tabs(active: Tab) -> Markup {
    let class = |tab: Tab| {
        if tab == active {
            "bg-blue-600 font-bold py-2 px-4 rounded"
        } else {
            "bg-gray-700 hover:bg-gray-600 py-2 px-4 rounded"
        }
    };

    html! {
        div class="flex flex-row space-x-2" {
            a href="/dashboard" class=(class(Tab::Students)) {"Mahasiswa"}
            a href="/dashboard/dosen" class=(class(Tab::Faculty)) {"Dosen Pengajar"}
        }
    }
}

/// Shell for the create/edit pages of either record kind.
pub fn editor_page(
    state: &KampusState,
    session: &ActiveSession,
    back_to: &str,
    heading: &str,
    error: Option<&str>,
    body: Markup,
) -> Markup {
    state.render(
        Some(session),
        html! {
            div class="w-full max-w-3xl flex flex-col space-y-4" {
                a href=(back_to) class="text-blue-400 hover:underline" {"← Kembali"}
                (title(heading))
                @if let Some(error) = error {
                    (alert(error))
                }
                (body)
            }
        },
    )
}

pub fn load_failed_page(
    state: &KampusState,
    session: &ActiveSession,
    back_to: &str,
    heading: &str,
    e: &KampusError,
) -> Response {
    warn!(?e, "unable to load editor");
    (
        failure_status(e),
        editor_page(state, session, back_to, heading, Some(LOAD_FAILED), html! {}),
    )
        .into_response()
}
