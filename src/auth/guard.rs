use crate::{
    auth::{USER_NAME_KEY, is_htmx, navigate, set_flash, stored_token, take_flash},
    error::{KampusResult, TowerSessionSnafu},
};
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use snafu::ResultExt;
use tower_sessions::Session;

/// Extracting this is the session guard: handlers that take it never run (and
/// so never call the API) unless a token is stored.
pub struct ActiveSession {
    pub session: Session,
    token: SecretString,
    pub user_name: Option<String>,
}

impl ActiveSession {
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or("Admin")
    }

    pub async fn flash(&self, message: &str) -> KampusResult<()> {
        set_flash(&self.session, message).await
    }

    pub async fn take_flash(&self) -> KampusResult<Option<String>> {
        take_flash(&self.session).await
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ActiveSession {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let Some(token) = stored_token(&session)
            .await
            .map_err(IntoResponse::into_response)?
        else {
            let path = parts.uri.path();
            debug!(?path, "no session token, redirecting to login");

            return Err(if is_htmx(&parts.headers) {
                navigate(true, "/login")
            } else {
                navigate(false, &format!("/login?next={path}"))
            });
        };

        let user_name = session
            .get::<String>(USER_NAME_KEY)
            .await
            .context(TowerSessionSnafu)
            .map_err(IntoResponse::into_response)?;

        Ok(Self {
            session,
            token,
            user_name,
        })
    }
}
