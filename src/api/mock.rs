use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::types::*;
use super::Backend;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub op: &'static str,
    pub id: Option<String>,
    pub body: Value,
}

/// Records every call and answers from per-operation scripted queues.
/// Update calls succeed by default; create calls fail if nothing was scripted.
#[derive(Default)]
pub struct MockBackend {
    calls: RefCell<Vec<RecordedCall>>,
    scripted: RefCell<HashMap<&'static str, VecDeque<ClientResult<Value>>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, op: &'static str, body: Value) {
        self.scripted
            .borrow_mut()
            .entry(op)
            .or_default()
            .push_back(Ok(body));
    }

    pub fn push_err(&self, op: &'static str, err: ClientError) {
        self.scripted
            .borrow_mut()
            .entry(op)
            .or_default()
            .push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.op == op).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record<B: Serialize + ?Sized>(&self, op: &'static str, id: Option<&str>, body: &B) {
        self.calls.borrow_mut().push(RecordedCall {
            op,
            id: id.map(str::to_string),
            body: serde_json::to_value(body).unwrap_or(Value::Null),
        });
    }

    fn next(&self, op: &'static str) -> Option<ClientResult<Value>> {
        self.scripted
            .borrow_mut()
            .get_mut(op)
            .and_then(|queue| queue.pop_front())
    }

    fn respond<R: DeserializeOwned>(&self, op: &'static str) -> ClientResult<R> {
        let value = self.next(op).unwrap_or_else(|| {
            Err(ClientError::Transport {
                context: op,
                message: "no scripted response".to_string(),
            })
        })?;
        serde_json::from_value(value).map_err(|e| ClientError::Decode {
            context: op,
            message: e.to_string(),
        })
    }

    fn acknowledge(&self, op: &'static str) -> ClientResult<()> {
        match self.next(op) {
            Some(Err(e)) => Err(e),
            _ => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl Backend for MockBackend {
    async fn register(&self, req: &RegisterRequest) -> ClientResult<()> {
        self.record("register", None, req);
        self.acknowledge("register")
    }

    async fn login(&self, req: &LoginRequest) -> ClientResult<LoginResponse> {
        self.record("login", None, req);
        self.respond("login")
    }

    async fn fetch_user(&self, user_id: &str) -> ClientResult<UserProfile> {
        self.record("fetch_user", Some(user_id), &Value::Null);
        self.respond("fetch_user")
    }

    async fn create_evaluation(&self, req: &EvaluationRequest) -> ClientResult<EvaluationResponse> {
        self.record("create_evaluation", None, req);
        self.respond("create_evaluation")
    }

    async fn update_evaluation(&self, id: &str, patch: &EvaluationPatch) -> ClientResult<()> {
        self.record("update_evaluation", Some(id), patch);
        self.acknowledge("update_evaluation")
    }

    async fn create_comparison(&self, req: &CompareRequest) -> ClientResult<CompareResponse> {
        self.record("create_comparison", None, req);
        self.respond("create_comparison")
    }

    async fn create_blind_results(&self, req: &BlindRequest) -> ClientResult<BlindResponse> {
        self.record("create_blind_results", None, req);
        self.respond("create_blind_results")
    }

    async fn create_optimization(
        &self,
        req: &OptimizationRequest,
    ) -> ClientResult<OptimizationResponse> {
        self.record("create_optimization", None, req);
        self.respond("create_optimization")
    }

    async fn update_optimization(&self, id: &str, update: &OptimizationUpdate) -> ClientResult<()> {
        self.record("update_optimization", Some(id), update);
        self.acknowledge("update_optimization")
    }

    async fn list_optimizations(&self, limit: u32) -> ClientResult<Vec<OptimizationResponse>> {
        self.record("list_optimizations", None, &serde_json::json!({ "limit": limit }));
        self.respond("list_optimizations")
    }
}
