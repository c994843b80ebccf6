use crate::{
    api::login::UNREACHABLE_MESSAGE,
    auth::{forget, is_htmx, navigate, stored_token, store_grant},
    error::{KampusError, KampusResult},
    maud_conveniences::{alert, form_submit_button, notice, simple_form_element, title},
    state::KampusState,
};
use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, uri::PathAndQuery},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;

const EXPIRED_MESSAGE: &str = "Sesi Anda telah berakhir, silakan masuk kembali.";

#[derive(Deserialize)]
pub struct LoginOptions {
    pub next: Option<String>,
    pub expired: Option<bool>,
}

pub async fn get_login(
    State(state): State<KampusState>,
    session: Session,
    Query(LoginOptions { next, expired }): Query<LoginOptions>,
) -> KampusResult<Response> {
    if stored_token(&session).await?.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let expired = expired.unwrap_or(false);
    Ok(state
        .render(None, login_box(next.as_deref(), "", None, expired))
        .into_response())
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: SecretString,
    next: Option<String>,
}

pub async fn post_login(
    State(state): State<KampusState>,
    session: Session,
    Form(LoginForm {
        email,
        password,
        next,
    }): Form<LoginForm>,
) -> KampusResult<Response> {
    let (status, message) = match state.login(email.trim(), &password).await {
        Ok(grant) => {
            store_grant(&session, grant).await?;
            info!(%email, "admin logged in");
            return Ok(Redirect::to(local_destination(next.as_deref())).into_response());
        }
        Err(KampusError::LoginRejected { message }) => (StatusCode::UNAUTHORIZED, message),
        Err(KampusError::Transport { source }) => {
            warn!(?source, "login could not reach the API");
            (StatusCode::BAD_GATEWAY, UNREACHABLE_MESSAGE.to_string())
        }
        Err(e) => return Err(e),
    };

    Ok((
        status,
        state.render(None, login_box(next.as_deref(), &email, Some(&message), false)),
    )
        .into_response())
}

pub async fn post_logout(session: Session, headers: HeaderMap) -> KampusResult<Response> {
    forget(&session).await?;
    Ok(navigate(is_htmx(&headers), "/login"))
}

/// Only paths on this site are followed after login; anything else lands on
/// the student list. Browsers drop tabs and newlines while parsing a
/// `Location`, so control and whitespace characters are refused too.
fn local_destination(next: Option<&str>) -> &str {
    match next {
        Some(next)
            if next.starts_with('/')
                && !next.starts_with("//")
                && !next
                    .chars()
                    .any(|c| c == '\\' || c.is_control() || c.is_whitespace())
                && next.parse::<PathAndQuery>().is_ok() =>
        {
            next
        }
        _ => "/dashboard",
    }
}

fn login_box(next: Option<&str>, email: &str, failure: Option<&str>, expired: bool) -> Markup {
    html! {
        div class="bg-gray-800 shadow-md rounded px-8 pt-6 pb-8 mb-4 w-full max-w-sm" {
            (title("Masuk"))
            @if expired {
                (notice(EXPIRED_MESSAGE))
            }
            @if let Some(failure) = failure {
                (alert(failure))
            }

            form method="post" action="/login" {
                @if let Some(next) = next {
                    input type="hidden" name="next" value=(next) {}
                }
                (simple_form_element("email", "Email", true, Some("email"), Some(email)))
                (simple_form_element("password", "Password", true, Some("password"), None))
                (form_submit_button(Some("Masuk")))
            }
        }
    }
}
