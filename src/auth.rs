use crate::{
    api::login::LoginGrant,
    error::{KampusResult, TowerSessionSnafu},
};
use axum::{
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use tower_sessions::Session;

pub mod guard;
pub mod janitor;

pub const TOKEN_KEY: &str = "token";
pub const USER_NAME_KEY: &str = "user_name";
pub const FLASH_KEY: &str = "flash";

pub async fn store_grant(session: &Session, grant: LoginGrant) -> KampusResult<()> {
    session.cycle_id().await.context(TowerSessionSnafu)?;
    session
        .insert(TOKEN_KEY, grant.token.expose_secret())
        .await
        .context(TowerSessionSnafu)?;

    match grant.user_name {
        Some(name) => session
            .insert(USER_NAME_KEY, name)
            .await
            .context(TowerSessionSnafu)?,
        None => {
            session
                .remove::<String>(USER_NAME_KEY)
                .await
                .context(TowerSessionSnafu)?;
        }
    }

    Ok(())
}

pub async fn stored_token(session: &Session) -> KampusResult<Option<SecretString>> {
    Ok(session
        .get::<String>(TOKEN_KEY)
        .await
        .context(TowerSessionSnafu)?
        .filter(|token| !token.is_empty())
        .map(SecretString::from))
}

pub async fn forget(session: &Session) -> KampusResult<()> {
    session.flush().await.context(TowerSessionSnafu)
}

pub async fn set_flash(session: &Session, message: &str) -> KampusResult<()> {
    session
        .insert(FLASH_KEY, message)
        .await
        .context(TowerSessionSnafu)
}

pub async fn take_flash(session: &Session) -> KampusResult<Option<String>> {
    session
        .remove::<String>(FLASH_KEY)
        .await
        .context(TowerSessionSnafu)
}

pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// htmx follows a plain redirect inside the XHR and swaps the target page into
/// the fragment, so its requests get `HX-Redirect` instead.
pub fn navigate(htmx: bool, to: &str) -> Response {
    if htmx {
        [("HX-Redirect", to)].into_response()
    } else {
        Redirect::to(to).into_response()
    }
}
