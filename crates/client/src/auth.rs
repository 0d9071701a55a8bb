//! Authentication API client methods

use crate::PadronClient;
use crate::error::{PadronError, normalize_error};
use padron_core::{LoginRequest, Validate};
use serde::{Deserialize, Serialize};

pub(crate) const LOGIN_PATH: &str = "/login/";
pub(crate) const TOKEN_REFRESH_PATH: &str = "/token/refresh/";

/// Successful login payload. Extra backend fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl PadronClient {
    /// Log in and store the credential pair.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, PadronError> {
        credentials.validate()?;

        let response: LoginResponse = self
            .post_json(LOGIN_PATH, credentials)
            .await
            .map_err(|error| normalize_error(&error))?;
        self.token_store()
            .set_tokens(&response.access_token, &response.refresh_token);
        Ok(response)
    }

    /// Drop the stored credential pair. Purely client-side.
    pub fn logout(&self) {
        self.token_store().clear();
    }
}
