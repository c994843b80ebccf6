use crate::{
    config::ApiConfig,
    data::{DataType, EditableDataType, RecordId, photo::Attachment},
    error::{
        BuildClientSnafu, DecodeBodySnafu, EncodePayloadSnafu, KampusError, KampusResult,
        TransportSnafu,
    },
};
use reqwest::{Client, Method, Response, header::ACCEPT, multipart::Form};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use snafu::ResultExt;
use std::sync::Arc;

pub mod envelope;
pub mod failure;
pub mod login;
pub mod multipart;

use envelope::{Collection, Single};
use failure::interpret;
use login::{Credentials, LoginBody, LoginGrant};

pub const FETCH_FALLBACK: &str = "Gagal mengambil data.";
pub const CREATE_FALLBACK: &str = "Gagal menyimpan data.";
pub const UPDATE_FALLBACK: &str = "Gagal update data.";
pub const DELETE_FALLBACK: &str = "Gagal menghapus data";

enum Outgoing {
    Nothing,
    Json(Value),
    Multipart(Form),
}

/// The one place that talks to the academic API: attaches the bearer token,
/// normalises response shapes and turns refusals into `KampusError`s.
/// Nothing is retried.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    config: Arc<ApiConfig>,
}

impl ApiClient {
    pub fn new(config: Arc<ApiConfig>) -> KampusResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context(BuildClientSnafu)?;

        Ok(Self { http, config })
    }

    pub async fn login(&self, email: &str, password: &SecretString) -> KampusResult<LoginGrant> {
        let url = self.config.endpoint("login");
        debug!(%url, "logging in against academic API");

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(&Credentials {
                email,
                password: password.expose_secret(),
            })
            .send()
            .await
            .context(TransportSnafu)?;

        let status = response.status();
        let bytes = response.bytes().await.context(TransportSnafu)?;
        let body: LoginBody = serde_json::from_slice(&bytes).unwrap_or_default();

        let grant = body.into_grant();
        match &grant {
            Ok(_) => info!(%status, "login accepted"),
            Err(e) => info!(%status, %e, "login refused"),
        }
        grant
    }

    pub async fn list<T: DataType>(&self, token: &SecretString) -> KampusResult<Vec<T>> {
        let response = self
            .send(Method::GET, T::PATH, token, Outgoing::Nothing, FETCH_FALLBACK)
            .await?;
        Ok(decode::<Collection<T>>(response).await?.into_vec())
    }

    pub async fn fetch<T: DataType>(&self, token: &SecretString, id: RecordId) -> KampusResult<T> {
        let path = format!("{}/{id}", T::PATH);
        let response = self
            .send(Method::GET, &path, token, Outgoing::Nothing, FETCH_FALLBACK)
            .await?;
        Ok(decode::<Single<T>>(response).await?.into_inner())
    }

    pub async fn create<T: EditableDataType>(
        &self,
        token: &SecretString,
        payload: &T::FormForAdding,
        attachment: Option<Attachment>,
    ) -> KampusResult<()> {
        let payload = serde_json::to_value(payload).context(EncodePayloadSnafu)?;
        let outgoing = match attachment {
            None => Outgoing::Json(payload),
            Some(attachment) => Outgoing::Multipart(multipart::form(&payload, attachment, None)?),
        };

        self.send(Method::POST, T::PATH, token, outgoing, CREATE_FALLBACK)
            .await?;
        Ok(())
    }

    /// With an attachment this goes out as a `POST` carrying `_method=PUT`,
    /// since the API only reads files from `POST` bodies.
    pub async fn update<T: EditableDataType>(
        &self,
        token: &SecretString,
        id: RecordId,
        payload: &T::FormForAdding,
        attachment: Option<Attachment>,
    ) -> KampusResult<()> {
        let path = format!("{}/{id}", T::PATH);
        let payload = serde_json::to_value(payload).context(EncodePayloadSnafu)?;
        let (method, outgoing) = match attachment {
            None => (Method::PUT, Outgoing::Json(payload)),
            Some(attachment) => (
                Method::POST,
                Outgoing::Multipart(multipart::form(&payload, attachment, Some("PUT"))?),
            ),
        };

        self.send(method, &path, token, outgoing, UPDATE_FALLBACK)
            .await?;
        Ok(())
    }

    pub async fn delete<T: DataType>(&self, token: &SecretString, id: RecordId) -> KampusResult<()> {
        let path = format!("{}/{id}", T::PATH);
        self.send(Method::DELETE, &path, token, Outgoing::Nothing, DELETE_FALLBACK)
            .await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: &SecretString,
        outgoing: Outgoing,
        fallback: &'static str,
    ) -> KampusResult<Response> {
        let url = self.config.endpoint(path);
        debug!(%method, %url, "calling academic API");

        let request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(token.expose_secret())
            .header(ACCEPT, "application/json");
        let request = match outgoing {
            Outgoing::Nothing => request,
            Outgoing::Json(payload) => request.json(&payload),
            Outgoing::Multipart(form) => request.multipart(form),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => {
                warn!(?source, %method, %url, "academic API unreachable");
                return Err(KampusError::Transport { source });
            }
        };

        interpret(response, fallback).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> KampusResult<T> {
    let bytes = response.bytes().await.context(TransportSnafu)?;
    serde_json::from_slice(&bytes).context(DecodeBodySnafu)
}
