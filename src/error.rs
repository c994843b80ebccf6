use crate::maud_conveniences::alert;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use snafu::Snafu;
use std::num::ParseIntError;

pub type KampusResult<T> = Result<T, KampusError>;

/// Shown whenever the remote API could not be reached at all.
pub const CONNECTIVITY_MESSAGE: &str = "Terjadi kesalahan koneksi ke server.";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum KampusError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse env var `{}` as a number", name))]
    ParseNumber {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("Error building the HTTP client"))]
    BuildClient { source: reqwest::Error },
    #[snafu(display("Error building a multipart upload"))]
    BuildMultipart { source: reqwest::Error },
    #[snafu(display("Error talking to the academic API"))]
    Transport { source: reqwest::Error },
    #[snafu(display("Error decoding the academic API response"))]
    DecodeBody { source: serde_json::Error },
    #[snafu(display("Error encoding the request payload"))]
    EncodePayload { source: serde_json::Error },
    #[snafu(display("Session expired or token rejected"))]
    Unauthorized,
    #[snafu(display("{}", message))]
    Api {
        status: StatusCode,
        field: Option<String>,
        message: String,
    },
    #[snafu(display("{}", message))]
    LoginRejected { message: String },
    #[snafu(display("Invalid value for `{}`", field))]
    InvalidFormField { field: &'static str },
    #[snafu(display("Foto harus berupa file gambar."))]
    InvalidAttachment,
    #[snafu(display("Error with sessions"))]
    TowerSession {
        source: tower_sessions::session::Error,
    },
    #[snafu(display("Error with multipart form input"))]
    Multipart {
        source: axum::extract::multipart::MultipartError,
    },
}

/// Marks a response produced because the API rejected the stored token, so the
/// session layer can forget it.
#[derive(Copy, Clone, Debug)]
pub struct SessionRejected;

impl KampusError {
    /// The text staff see in the current view when an operation fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { .. } => CONNECTIVITY_MESSAGE.to_string(),
            Self::DecodeBody { .. } => "Respons server tidak dapat dibaca.".to_string(),
            Self::InvalidFormField { field } => format!("Isian `{field}` tidak valid."),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for KampusError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //upstream broke
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        if matches!(self, Self::Unauthorized) {
            warn!("API rejected session token, sending to login");
            let mut response = Redirect::to("/login").into_response();
            response.extensions_mut().insert(SessionRejected);
            return response;
        }

        let status_code = match &self {
            Self::BadEnvVar { .. } | Self::ParseNumber { .. } => ISE,
            Self::BuildClient { .. } | Self::BuildMultipart { .. } => ISE,
            Self::Transport { .. } | Self::DecodeBody { .. } => BG,
            Self::EncodePayload { .. } => ISE,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Api { status, .. } => *status,
            Self::LoginRejected { .. } => StatusCode::UNAUTHORIZED,
            Self::InvalidFormField { .. } | Self::InvalidAttachment => BI,
            Self::TowerSession { .. } => ISE,
            Self::Multipart { source } => source.status(),
        };

        error!(?self, "Error!");
        (status_code, Html(alert(self.user_message()))).into_response()
    }
}
