use crate::error::{KampusError, KampusResult};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub const REJECTED_MESSAGE: &str = "Email atau password salah.";
pub const UNREACHABLE_MESSAGE: &str = "Gagal menghubungi server. Cek koneksi internet Anda.";

#[derive(Serialize)]
pub(super) struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct LoginUser {
    #[serde(default)]
    name: Option<String>,
}

/// The login response; the token arrives under either of two names.
#[derive(Debug, Default, Deserialize)]
pub(super) struct LoginBody {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<LoginUser>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug)]
pub struct LoginGrant {
    pub token: SecretString,
    pub user_name: Option<String>,
}

impl LoginBody {
    pub fn into_grant(self) -> KampusResult<LoginGrant> {
        let Some(token) = self
            .token
            .or(self.access_token)
            .filter(|token| !token.trim().is_empty())
        else {
            return Err(KampusError::LoginRejected {
                message: self
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| REJECTED_MESSAGE.to_string()),
            });
        };

        Ok(LoginGrant {
            token: SecretString::from(token),
            user_name: self
                .user
                .and_then(|user| user.name)
                .filter(|name| !name.trim().is_empty()),
        })
    }
}
