use tracing::info;

use super::require_text;
use crate::api::types::{display_value, EvaluationRequest};
use crate::api::Backend;
use crate::error::ClientResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationInput {
    pub user_query: String,
    pub provider: String,
    pub model: String,
    /// `human` or `llm`.
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRecord {
    pub id: Option<String>,
    pub user_query: String,
    pub method: String,
    pub rating: Option<String>,
    pub reasons: Vec<String>,
}

impl EvaluationRecord {
    pub fn reasons_text(&self) -> String {
        self.reasons.join("\n")
    }
}

pub async fn evaluate<B: Backend + ?Sized>(
    backend: &B,
    input: &EvaluationInput,
) -> ClientResult<EvaluationRecord> {
    require_text("user_query", &input.user_query, "Please enter (or load) some text.")?;

    info!("Evaluating prompt ({}) with {} / {}", input.method, input.provider, input.model);
    let resp = backend
        .create_evaluation(&EvaluationRequest {
            user_query: input.user_query.clone(),
            provider: input.provider.clone(),
            model: input.model.clone(),
            evaluation_method: input.method.clone(),
        })
        .await?;

    let (rating, reasons) = match resp.evaluation_result {
        Some(result) => (
            result
                .prompt_rating
                .as_ref()
                .map(display_value)
                .filter(|r| !r.is_empty()),
            result.reasons.map(|r| r.into_lines()).unwrap_or_default(),
        ),
        None => (None, Vec::new()),
    };

    Ok(EvaluationRecord {
        id: resp.id,
        user_query: input.user_query.clone(),
        method: input.method.clone(),
        rating,
        reasons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use serde_json::json;

    fn input(query: &str) -> EvaluationInput {
        EvaluationInput {
            user_query: query.to_string(),
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            method: "llm".to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_query_never_dispatches() {
        let mock = MockBackend::new();
        assert!(evaluate(&mock, &input("")).await.unwrap_err().is_validation());
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_evaluate_reads_rating_and_reasons() {
        let mock = MockBackend::new();
        mock.push_ok(
            "create_evaluation",
            json!({
                "_id": "ev-1",
                "evaluation_result": {"prompt_rating": 8, "reasons": ["Specific", "Has context"]}
            }),
        );
        let record = evaluate(&mock, &input("Write a haiku about Rust")).await.unwrap();

        assert_eq!(
            mock.calls()[0].body,
            json!({
                "user_query": "Write a haiku about Rust",
                "provider": "openai",
                "model": "gpt-3.5-turbo",
                "evaluation_method": "llm"
            })
        );
        assert_eq!(record.rating.as_deref(), Some("8"));
        assert_eq!(record.reasons_text(), "Specific\nHas context");
    }

    #[tokio::test]
    async fn test_missing_result_clears_rating() {
        let mock = MockBackend::new();
        mock.push_ok("create_evaluation", json!({"_id": "ev-2"}));
        let record = evaluate(&mock, &input("q")).await.unwrap();
        assert_eq!(record.rating, None);
        assert!(record.reasons.is_empty());
    }
}
