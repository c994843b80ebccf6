use crate::error::{KampusError, KampusResult, TransportSnafu, UnauthorizedSnafu};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use snafu::ResultExt;

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<Value>,
}

/// What went wrong with a refused request, reduced to one message.
#[derive(Debug, PartialEq, Eq)]
pub struct ApiFailure {
    pub field: Option<String>,
    pub message: String,
}

impl ApiFailure {
    /// The first message of the first field in `errors` wins over `message`;
    /// `fallback` covers bodies with neither (or no JSON at all).
    pub fn from_body(bytes: &[u8], fallback: &str) -> Self {
        let body: ErrorBody = serde_json::from_slice(bytes).unwrap_or_default();

        let field_error = match &body.errors {
            Some(Value::Object(fields)) => fields
                .iter()
                .find_map(|(field, messages)| first_message(messages).map(|m| (field, m))),
            _ => None,
        };

        if let Some((field, message)) = field_error {
            return Self {
                field: Some(field.clone()),
                message,
            };
        }

        Self {
            field: None,
            message: body
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

fn first_message(messages: &Value) -> Option<String> {
    match messages {
        Value::Array(messages) => messages.iter().find_map(Value::as_str).map(ToString::to_string),
        Value::String(message) => Some(message.clone()),
        _ => None,
    }
}

/// Passes 2xx responses through and turns everything else into a `KampusError`.
pub async fn interpret(response: Response, fallback: &'static str) -> KampusResult<Response> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return UnauthorizedSnafu.fail();
    }
    if status.is_success() {
        return Ok(response);
    }

    let bytes = response.bytes().await.context(TransportSnafu)?;
    let ApiFailure { field, message } = ApiFailure::from_body(&bytes, fallback);
    warn!(%status, ?field, %message, "academic API refused request");

    Err(KampusError::Api {
        status,
        field,
        message,
    })
}
