//! Run the original and optimized query side by side, then record the
//! user's verdict once.

use tracing::{debug, info, warn};

use super::require_text;
use crate::api::types::{display_value, CompareRequest, EvaluationPatch, Verdict};
use crate::api::Backend;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonInput {
    pub user_query: String,
    pub optimized_query: String,
    pub provider: String,
    pub model: String,
}

impl ComparisonInput {
    pub fn validate(&self) -> ClientResult<()> {
        require_text(
            "user_query",
            &self.user_query,
            "Please enter (or load) text in both fields.",
        )?;
        require_text(
            "optimized_query",
            &self.optimized_query,
            "Please enter (or load) text in both fields.",
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRecord {
    pub id: Option<String>,
    pub user_query: String,
    pub optimized_query: String,
    pub provider: String,
    pub model: String,
    /// Rendered text; `None` when the backend omitted that side.
    pub default_response: Option<String>,
    pub optimized_response: Option<String>,
    pub verdict: Option<Verdict>,
    pending_verdict: Option<Verdict>,
}

impl ComparisonRecord {
    /// False once a verdict is recorded or while one is being saved.
    pub fn can_submit_verdict(&self) -> bool {
        self.verdict.is_none() && self.pending_verdict.is_none()
    }

    pub fn is_submitting(&self) -> bool {
        self.pending_verdict.is_some()
    }

    /// Claims the single verdict slot before the request goes out.
    pub fn begin_verdict(&mut self, verdict: Verdict) -> ClientResult<String> {
        if !self.can_submit_verdict() {
            return Err(ClientError::VerdictAlreadyRecorded);
        }
        let id = self
            .id
            .clone()
            .ok_or(ClientError::MissingReference("No comparison found or missing ID."))?;
        self.pending_verdict = Some(verdict);
        Ok(id)
    }

    /// Settles a verdict started with [`begin_verdict`](Self::begin_verdict).
    /// A failure frees the slot so the user can try again. Returns `false`
    /// without touching the record if `id` is not the comparison the verdict
    /// was started on.
    pub fn finish_verdict(&mut self, id: &str, saved: bool) -> bool {
        if self.id.as_deref() != Some(id) {
            debug!("Ignoring verdict result for replaced comparison {}", id);
            return false;
        }
        let Some(verdict) = self.pending_verdict.take() else {
            return false;
        };
        if saved {
            self.verdict = Some(verdict);
        }
        true
    }
}

pub async fn compare<B: Backend + ?Sized>(
    backend: &B,
    input: &ComparisonInput,
) -> ClientResult<ComparisonRecord> {
    input.validate()?;

    info!("Comparing queries with {} / {}", input.provider, input.model);
    let resp = backend
        .create_comparison(&CompareRequest {
            user_query: input.user_query.clone(),
            optimized_user_query: input.optimized_query.clone(),
            provider: input.provider.clone(),
            model: input.model.clone(),
        })
        .await?;

    let parsed = resp.parsed_result_after_comparison.unwrap_or_default();
    if parsed.default_query_response.is_none() || parsed.optimized_query_response.is_none() {
        warn!("Comparison returned partial results");
    }

    Ok(ComparisonRecord {
        id: resp.id.filter(|id| !id.is_empty()),
        user_query: input.user_query.clone(),
        optimized_query: input.optimized_query.clone(),
        provider: input.provider.clone(),
        model: input.model.clone(),
        default_response: parsed.default_query_response.as_ref().map(display_value),
        optimized_response: parsed.optimized_query_response.as_ref().map(display_value),
        verdict: None,
        pending_verdict: None,
    })
}

/// Saves a verdict claimed with [`ComparisonRecord::begin_verdict`].
pub async fn persist_verdict<B: Backend + ?Sized>(
    backend: &B,
    id: &str,
    verdict: Verdict,
) -> ClientResult<()> {
    info!("Submitting verdict {} for {}", verdict.label(), id);
    let result = backend
        .update_evaluation(
            id,
            &EvaluationPatch {
                user_verdict_after_comparison: Some(verdict),
                ..Default::default()
            },
        )
        .await;
    if let Err(e) = &result {
        warn!("Failed to record verdict: {}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use serde_json::json;

    fn input(original: &str, optimized: &str) -> ComparisonInput {
        ComparisonInput {
            user_query: original.to_string(),
            optimized_query: optimized.to_string(),
            provider: "claude".to_string(),
            model: "claude-3-5-haiku-latest".to_string(),
        }
    }

    async fn compared(mock: &MockBackend) -> ComparisonRecord {
        mock.push_ok(
            "create_comparison",
            json!({
                "_id": "cmp-1",
                "parsed_result_after_comparison": {
                    "default_query_response": "plain answer",
                    "optimized_query_response": {"answer": "structured", "steps": 3}
                }
            }),
        );
        compare(mock, &input("What is Rust?", "Explain Rust to a C++ developer."))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_blank_queries_never_dispatch() {
        let mock = MockBackend::new();
        assert!(compare(&mock, &input("", "x")).await.unwrap_err().is_validation());
        assert!(compare(&mock, &input("x", " \t")).await.unwrap_err().is_validation());
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_compare_parses_both_sides() {
        let mock = MockBackend::new();
        let record = compared(&mock).await;

        assert_eq!(
            mock.calls()[0].body,
            json!({
                "user_query": "What is Rust?",
                "optimized_user_query": "Explain Rust to a C++ developer.",
                "provider": "claude",
                "model": "claude-3-5-haiku-latest"
            })
        );
        assert_eq!(record.id.as_deref(), Some("cmp-1"));
        assert_eq!(record.default_response.as_deref(), Some("plain answer"));
        assert!(record.optimized_response.unwrap().contains("\"steps\": 3"));
        assert_eq!(record.verdict, None);
    }

    #[tokio::test]
    async fn test_compare_tolerates_missing_side() {
        let mock = MockBackend::new();
        mock.push_ok(
            "create_comparison",
            json!({"_id": "cmp-2", "parsed_result_after_comparison": {"optimized_query_response": "only this"}}),
        );
        let record = compare(&mock, &input("a", "b")).await.unwrap();
        assert_eq!(record.default_response, None);
        assert_eq!(record.optimized_response.as_deref(), Some("only this"));

        mock.push_ok("create_comparison", json!({"_id": "cmp-3"}));
        let record = compare(&mock, &input("a", "b")).await.unwrap();
        assert_eq!(record.default_response, None);
        assert_eq!(record.optimized_response, None);
    }

    /// Same sequence the compare page runs.
    async fn submit(mock: &MockBackend, record: &mut ComparisonRecord, verdict: Verdict) -> ClientResult<()> {
        let id = record.begin_verdict(verdict)?;
        let result = persist_verdict(mock, &id, verdict).await;
        assert!(record.finish_verdict(&id, result.is_ok()));
        result
    }

    #[tokio::test]
    async fn test_second_verdict_is_rejected() {
        let mock = MockBackend::new();
        let mut record = compared(&mock).await;

        submit(&mock, &mut record, Verdict::Better).await.unwrap();
        let err = submit(&mock, &mut record, Verdict::Worse).await.unwrap_err();

        assert!(matches!(err, ClientError::VerdictAlreadyRecorded));
        assert_eq!(record.verdict, Some(Verdict::Better));
        assert!(!record.can_submit_verdict());
        assert_eq!(mock.count("update_evaluation"), 1);

        let call = mock.calls().pop().unwrap();
        assert_eq!(call.id.as_deref(), Some("cmp-1"));
        assert_eq!(call.body, json!({"user_verdict_after_comparison": "Better"}));
    }

    #[tokio::test]
    async fn test_verdict_without_id_is_missing_reference() {
        let mock = MockBackend::new();
        mock.push_ok("create_comparison", json!({}));
        let mut record = compare(&mock, &input("a", "b")).await.unwrap();

        let err = submit(&mock, &mut record, Verdict::Tie).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingReference(_)));
        assert_eq!(record.verdict, None);
        assert_eq!(mock.count("update_evaluation"), 0);
    }

    #[tokio::test]
    async fn test_failed_verdict_can_be_retried() {
        let mock = MockBackend::new();
        let mut record = compared(&mock).await;

        mock.push_err(
            "update_evaluation",
            ClientError::Transport {
                context: "Updating evaluation",
                message: "network down".to_string(),
            },
        );
        assert!(submit(&mock, &mut record, Verdict::Tie).await.is_err());
        assert_eq!(record.verdict, None);
        assert!(record.can_submit_verdict());

        submit(&mock, &mut record, Verdict::Tie).await.unwrap();
        assert_eq!(record.verdict, Some(Verdict::Tie));
    }

    #[tokio::test]
    async fn test_verdict_result_for_replaced_comparison_is_ignored() {
        let mock = MockBackend::new();
        let mut first = compared(&mock).await;
        let id = first.begin_verdict(Verdict::Better).unwrap();

        // The user runs a new comparison before the save resolves.
        mock.push_ok("create_comparison", json!({"_id": "cmp-2"}));
        let mut second = compare(&mock, &input("a", "b")).await.unwrap();
        assert!(!second.finish_verdict(&id, true));
        assert_eq!(second.verdict, None);
        assert!(second.can_submit_verdict());

        assert!(first.finish_verdict(&id, true));
        assert!(!first.finish_verdict(&id, false));
        assert_eq!(first.verdict, Some(Verdict::Better));
    }

    #[test]
    fn test_pending_verdict_blocks_another() {
        let mut record = ComparisonRecord {
            id: Some("cmp".to_string()),
            user_query: "a".to_string(),
            optimized_query: "b".to_string(),
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            default_response: None,
            optimized_response: None,
            verdict: None,
            pending_verdict: None,
        };
        record.begin_verdict(Verdict::Better).unwrap();
        assert!(record.is_submitting());
        assert!(matches!(
            record.begin_verdict(Verdict::Worse),
            Err(ClientError::VerdictAlreadyRecorded)
        ));
        assert!(record.finish_verdict("cmp", true));
        assert_eq!(record.verdict, Some(Verdict::Better));
    }
}
