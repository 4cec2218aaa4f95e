use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use super::types::*;
use super::Backend;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;

/// `fetch`-backed client for the REST backend.
///
/// Protected calls read the bearer token from the session store on every
/// request. A call without a token is still sent so the server can reject it.
/// No timeout is set; the browser transport decides.
#[derive(Debug, Clone)]
pub struct HttpBackend<S> {
    client: reqwest::Client,
    base_url: String,
    session: SessionStore<S>,
}

impl<S: KeyValueStorage> HttpBackend<S> {
    pub fn new(base_url: impl Into<String>, session: SessionStore<S>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: crate::config::normalize_base_url(&base_url.into()),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => {
                warn!("Sending protected request without a session token");
                builder
            }
        }
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        protected: bool,
        context: &'static str,
    ) -> ClientResult<Response> {
        let builder = if protected {
            self.authorized(builder)
        } else {
            builder
        };

        let response = builder.send().await.map_err(|e| ClientError::Transport {
            context,
            message: e.to_string(),
        })?;

        check_status(response.status(), protected, context)?;
        Ok(response)
    }

    async fn read_json<R: DeserializeOwned>(
        response: Response,
        context: &'static str,
    ) -> ClientResult<R> {
        response.json::<R>().await.map_err(|e| ClientError::Decode {
            context,
            message: e.to_string(),
        })
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        protected: bool,
        context: &'static str,
    ) -> ClientResult<R> {
        info!("POST {}", path);
        let builder = self.client.post(self.url(path)).json(body);
        let response = self.send(builder, protected, context).await?;
        Self::read_json(response, context).await
    }

    async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: &'static str,
    ) -> ClientResult<()> {
        info!("PUT {}", path);
        let builder = self.client.put(self.url(path)).json(body);
        self.send(builder, true, context).await.map(|_| ())
    }

    async fn get<R: DeserializeOwned>(&self, path: &str, context: &'static str) -> ClientResult<R> {
        info!("GET {}", path);
        let builder = self.client.get(self.url(path));
        let response = self.send(builder, true, context).await?;
        Self::read_json(response, context).await
    }
}

/// Non-2xx is a failure regardless of detail, except that an auth rejection
/// on a protected call means the session is no longer usable.
fn check_status(status: StatusCode, protected: bool, context: &'static str) -> ClientResult<()> {
    if status.is_success() {
        return Ok(());
    }
    warn!("{} returned HTTP {}", context, status.as_u16());
    if protected && (status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN) {
        return Err(ClientError::SessionInvalid);
    }
    Err(ClientError::Http {
        status: status.as_u16(),
        context,
    })
}

#[async_trait(?Send)]
impl<S: KeyValueStorage> Backend for HttpBackend<S> {
    async fn register(&self, req: &RegisterRequest) -> ClientResult<()> {
        self.post::<_, serde_json::Value>("/users/register", req, false, "Registration")
            .await
            .map(|_| ())
    }

    async fn login(&self, req: &LoginRequest) -> ClientResult<LoginResponse> {
        self.post("/users/login", req, false, "Login").await
    }

    async fn fetch_user(&self, user_id: &str) -> ClientResult<UserProfile> {
        self.get(&format!("/users/{}", user_id), "Fetching user info")
            .await
    }

    async fn create_evaluation(&self, req: &EvaluationRequest) -> ClientResult<EvaluationResponse> {
        self.post("/evaluations/", req, true, "Evaluation").await
    }

    async fn update_evaluation(&self, id: &str, patch: &EvaluationPatch) -> ClientResult<()> {
        self.put(&format!("/evaluations/{}", id), patch, "Updating evaluation")
            .await
    }

    async fn create_comparison(&self, req: &CompareRequest) -> ClientResult<CompareResponse> {
        self.post("/evaluations/compare", req, true, "Comparison request")
            .await
    }

    async fn create_blind_results(&self, req: &BlindRequest) -> ClientResult<BlindResponse> {
        self.post("/evaluations/multi_versions", req, true, "Blind results request")
            .await
    }

    async fn create_optimization(
        &self,
        req: &OptimizationRequest,
    ) -> ClientResult<OptimizationResponse> {
        self.post("/optimizations/", req, true, "Creating optimized prompt")
            .await
    }

    async fn update_optimization(&self, id: &str, update: &OptimizationUpdate) -> ClientResult<()> {
        self.put(&format!("/optimizations/{}", id), update, "Updating optimized prompt")
            .await
    }

    async fn list_optimizations(&self, limit: u32) -> ClientResult<Vec<OptimizationResponse>> {
        self.get(&format!("/optimizations/?limit={}", limit), "Listing optimizations")
            .await
    }
}
