//! Padron HTTP client
//!
//! The authenticated request pipeline: a token store holding the credential
//! pair, a dispatcher that attaches the access credential to every outgoing
//! request, and a one-shot refresh-on-401 recovery around each call.

pub mod auth;
mod cache;
pub mod error;
pub mod environments;
pub mod establishments;
pub mod tokens;

pub use auth::LoginResponse;
pub use error::{ClientError, PadronError};
pub use establishments::EstablishmentListParams;
pub use tokens::TokenStore;

use cache::QueryCache;
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Padron API client
#[derive(Clone)]
pub struct PadronClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: Client,
    base_url: String,
    tokens: Arc<TokenStore>,
    cache: QueryCache,
    // Held across the refresh-endpoint call so concurrent authorization
    // failures share one in-flight refresh.
    refresh_gate: tokio::sync::Mutex<()>,
}

impl PadronClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> PadronClientBuilder {
        PadronClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub(crate) fn token_store(&self) -> &TokenStore {
        &self.inner.tokens
    }

    pub(crate) fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    /// Create a request builder, attaching the bearer credential when one
    /// is given. Absence never blocks the request.
    fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut request = self.inner.http.request(method, url);

        if let Some(token) = bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        request
    }

    /// Build and dispatch one request. No recovery, no retries.
    async fn dispatch<Q, B>(
        &self,
        method: &Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
        bearer: Option<&str>,
    ) -> Result<Response, ClientError>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let mut request = self.request(method.clone(), path, bearer);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Dispatch with the one-shot 401 recovery protocol.
    ///
    /// On an authorization failure the stored refresh credential is spent
    /// on exactly one silent refresh and the request is replayed exactly
    /// once; a second authorization failure is returned as-is. Both a
    /// missing refresh credential and a failed refresh clear the token
    /// store.
    pub(crate) async fn send<Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<Response, ClientError>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let access = self.inner.tokens.access();
        let response = self
            .dispatch(&method, path, query, body, access.as_deref())
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let original = error::from_response(response).await;
        if self.inner.tokens.refresh().is_none() {
            warn!("authorization failed with no refresh credential, clearing session");
            self.inner.tokens.clear();
            return Err(original);
        }

        if let Err(refresh_error) = self.refresh_access(access.as_deref()).await {
            warn!("token refresh failed, clearing session");
            self.inner.tokens.clear();
            return Err(refresh_error);
        }

        let fresh = self.inner.tokens.access();
        self.dispatch(&method, path, query, body, fresh.as_deref())
            .await
    }

    /// Exchange the refresh credential for a new access credential.
    ///
    /// `stale` is the access credential the failed request carried; if the
    /// store already holds a different one by the time the gate is
    /// acquired, a concurrent request completed the refresh and this one
    /// is skipped.
    async fn refresh_access(&self, stale: Option<&str>) -> Result<(), ClientError> {
        let _guard = self.inner.refresh_gate.lock().await;

        if let Some(current) = self.inner.tokens.access()
            && Some(current.as_str()) != stale
        {
            debug!("access credential already refreshed by a concurrent request");
            return Ok(());
        }

        let Some(refresh) = self.inner.tokens.refresh() else {
            return Err(ClientError::AuthenticationFailed(
                "no refresh credential available".to_string(),
            ));
        };

        // The refresh call is a plain dispatch: unauthenticated and never
        // itself retried.
        let request = auth::RefreshRequest {
            refresh: refresh.clone(),
        };
        let response = self
            .dispatch(
                &Method::POST,
                auth::TOKEN_REFRESH_PATH,
                None::<&()>,
                Some(&request),
                None,
            )
            .await?;
        if !response.status().is_success() {
            return Err(error::from_response(response).await);
        }

        let tokens: auth::RefreshResponse = response.json().await?;
        // The refresh credential is preserved unless the backend reissues one.
        let refresh = tokens.refresh.unwrap_or(refresh);
        self.inner.tokens.set_tokens(&tokens.access, &refresh);
        debug!("access credential refreshed");
        Ok(())
    }

    pub(crate) async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.send(Method::GET, path, query, None::<&()>).await?;
        decode(response).await
    }

    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send(Method::POST, path, None::<&()>, Some(body))
            .await?;
        decode(response).await
    }

    pub(crate) async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Method::PUT, path, None::<&()>, Some(body)).await?;
        decode(response).await
    }

    pub(crate) async fn delete_empty(&self, path: &str) -> Result<(), ClientError> {
        let response = self
            .send(Method::DELETE, path, None::<&()>, None::<&()>)
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error::from_response(response).await)
        }
    }
}

/// Decode a successful response, or capture the error it carries.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if response.status().is_success() {
        Ok(response.json().await?)
    } else {
        Err(error::from_response(response).await)
    }
}

/// Builder for PadronClient
#[derive(Default)]
pub struct PadronClientBuilder {
    base_url: Option<String>,
    token_store: Option<Arc<TokenStore>>,
    user_agent: Option<String>,
}

impl PadronClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Inject the token store shared with the rest of the application.
    /// Without one, the client keeps an ephemeral in-memory session.
    pub fn token_store(mut self, store: Arc<TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<PadronClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let http = ClientBuilder::new()
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| "padron-client/0.1.0".to_string()),
            )
            .build()?;

        let tokens = self
            .token_store
            .unwrap_or_else(|| Arc::new(TokenStore::in_memory()));

        Ok(PadronClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                tokens,
                cache: QueryCache::new(),
                refresh_gate: tokio::sync::Mutex::new(()),
            }),
        })
    }
}
