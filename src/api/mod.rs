//! The REST backend as seen from the client.
//!
//! Workflows talk to [`Backend`] only; [`http::HttpBackend`] is the browser
//! implementation and tests script a recording mock.

pub mod http;
#[cfg(test)]
pub mod mock;
pub mod types;

use async_trait::async_trait;

use crate::error::ClientResult;
use types::*;

/// One method per backend endpoint. Everything runs on the browser's single
/// thread, so futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait Backend {
    /// `POST /users/register`
    async fn register(&self, req: &RegisterRequest) -> ClientResult<()>;

    /// `POST /users/login`
    async fn login(&self, req: &LoginRequest) -> ClientResult<LoginResponse>;

    /// `GET /users/{id}`
    async fn fetch_user(&self, user_id: &str) -> ClientResult<UserProfile>;

    /// `POST /evaluations/`
    async fn create_evaluation(&self, req: &EvaluationRequest) -> ClientResult<EvaluationResponse>;

    /// `PUT /evaluations/{id}`
    async fn update_evaluation(&self, id: &str, patch: &EvaluationPatch) -> ClientResult<()>;

    /// `POST /evaluations/compare`
    async fn create_comparison(&self, req: &CompareRequest) -> ClientResult<CompareResponse>;

    /// `POST /evaluations/multi_versions`
    async fn create_blind_results(&self, req: &BlindRequest) -> ClientResult<BlindResponse>;

    /// `POST /optimizations/`
    async fn create_optimization(
        &self,
        req: &OptimizationRequest,
    ) -> ClientResult<OptimizationResponse>;

    /// `PUT /optimizations/{id}`
    async fn update_optimization(&self, id: &str, update: &OptimizationUpdate) -> ClientResult<()>;

    /// `GET /optimizations/?limit=N`
    async fn list_optimizations(&self, limit: u32) -> ClientResult<Vec<OptimizationResponse>>;
}
