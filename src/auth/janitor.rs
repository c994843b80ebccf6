use crate::{
    auth::{forget, is_htmx, navigate},
    error::SessionRejected,
};
use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

/// Clears the stored token and display name whenever a handler reports that
/// the API rejected them, then sends the browser to the login page.
pub async fn forget_rejected_sessions(session: Session, request: Request, next: Next) -> Response {
    let htmx = is_htmx(request.headers());
    let response = next.run(request).await;

    if response.extensions().get::<SessionRejected>().is_none() {
        return response;
    }

    if let Err(e) = forget(&session).await {
        error!(?e, "unable to clear rejected session");
    }
    navigate(htmx, "/login?expired=true")
}
