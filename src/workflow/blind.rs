//! Blind results: several anonymized answers to one query, one irrevocable
//! pick, then the generating models are revealed.

use std::ops::RangeInclusive;

use tracing::{debug, info, warn};

use super::{require_range, require_text};
use crate::api::types::{display_value, BlindRequest, BlindResult, EvaluationPatch};
use crate::api::Backend;
use crate::error::{ClientError, ClientResult};

pub const VERSION_RANGE: RangeInclusive<u8> = 2..=4;
pub const DEFAULT_VERSIONS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlindPhase {
    Collecting,
    Generated,
    Selected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlindSession {
    pub id: Option<String>,
    candidates: Vec<BlindResult>,
    chosen_index: Option<usize>,
    revealed: bool,
}

/// What a page may show for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateView {
    pub index: usize,
    /// "Version N" until revealed, then the model name.
    pub label: String,
    pub response: String,
    pub chosen: bool,
}

impl BlindSession {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn chosen_index(&self) -> Option<usize> {
        self.chosen_index
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn phase(&self) -> BlindPhase {
        if self.chosen_index.is_some() {
            BlindPhase::Selected
        } else {
            BlindPhase::Generated
        }
    }

    /// Model name of candidate `index`, hidden until revealed.
    pub fn model(&self, index: usize) -> Option<&str> {
        if !self.revealed {
            return None;
        }
        self.candidates.get(index).map(|c| c.model.as_str())
    }

    pub fn views(&self) -> Vec<CandidateView> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| CandidateView {
                index,
                label: if self.revealed && candidate.model.is_empty() {
                    "Unknown model".to_string()
                } else if self.revealed {
                    candidate.model.clone()
                } else {
                    format!("Version {}", index + 1)
                },
                response: display_value(&candidate.response),
                chosen: self.chosen_index == Some(index),
            })
            .collect()
    }

    /// Claims the selection slot. Returns what to persist, or `None` if a
    /// candidate was already chosen.
    pub fn begin_selection(&mut self, index: usize) -> ClientResult<Option<SelectionClaim>> {
        if index >= self.candidates.len() {
            return Err(ClientError::validation(
                "selection",
                format!("No candidate at position {}", index + 1),
            ));
        }
        if self.chosen_index.is_some() {
            debug!("Ignoring selection {}: already chosen", index);
            return Ok(None);
        }
        self.chosen_index = Some(index);
        Ok(Some(SelectionClaim {
            id: self.id.clone(),
            index,
            model: self.candidates[index].model.clone(),
        }))
    }

    /// Reveals the models once the persistence attempt for `claim` is over,
    /// whatever its outcome. Returns `false` if `claim` was made on another
    /// session, which is then left untouched.
    pub fn finish_selection(&mut self, claim: &SelectionClaim) -> bool {
        if self.id != claim.id || self.chosen_index != Some(claim.index) || self.revealed {
            debug!("Ignoring selection result for a replaced blind session");
            return false;
        }
        self.revealed = true;
        true
    }
}

/// A selection made locally whose persistence has not resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionClaim {
    pub id: Option<String>,
    pub index: usize,
    /// Empty when the backend sent no model for that candidate.
    pub model: String,
}

pub async fn generate<B: Backend + ?Sized>(
    backend: &B,
    query: &str,
    version_count: u8,
) -> ClientResult<BlindSession> {
    require_text("user_query", query, "Please enter (or load) some text.")?;
    require_range(
        "num_versions",
        version_count,
        VERSION_RANGE,
        "Please set the number of versions from 2 to 4.",
    )?;

    info!("Requesting {} blind versions", version_count);
    let resp = backend
        .create_blind_results(&BlindRequest {
            user_query: query.to_string(),
            num_versions: version_count,
        })
        .await?;

    let candidates = resp.blind_results.ok_or_else(|| ClientError::Decode {
        context: "Blind results request",
        message: "no \"blind_results\" found in response".to_string(),
    })?;
    if candidates.iter().any(|c| c.model.is_empty()) {
        warn!("Blind results contain candidates without a model name");
    }

    Ok(BlindSession {
        id: resp.id.filter(|id| !id.is_empty()),
        candidates,
        chosen_index: None,
        revealed: false,
    })
}

/// Saves the chosen model against the blind results document.
pub async fn persist_choice<B: Backend + ?Sized>(
    backend: &B,
    claim: &SelectionClaim,
) -> ClientResult<()> {
    let id = claim.id.as_deref().ok_or(ClientError::MissingReference(
        "No response data found or missing ID.",
    ))?;
    if claim.model.is_empty() {
        return Err(ClientError::MissingReference(
            "The chosen version has no model name.",
        ));
    }
    info!("Recording blind choice {} for {}", claim.model, id);
    let result = backend
        .update_evaluation(
            id,
            &EvaluationPatch {
                chosen_model_after_blind_results: Some(claim.model.clone()),
                ..Default::default()
            },
        )
        .await;
    if let Err(e) = &result {
        warn!("Failed to record blind choice: {}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use serde_json::json;

    fn script_three(mock: &MockBackend) {
        mock.push_ok(
            "create_blind_results",
            json!({
                "_id": "blind-1",
                "blind_results": [
                    {"model": "gpt-4o", "response": "Summary A"},
                    {"model": "claude-3-7-sonnet-latest", "response": "Summary B"},
                    {"model": "gpt-4o-mini", "response": "Summary C"}
                ]
            }),
        );
    }

    #[tokio::test]
    async fn test_version_count_out_of_range_never_dispatches() {
        let mock = MockBackend::new();
        for n in (0..=u8::MAX).filter(|n| !VERSION_RANGE.contains(n)) {
            let err = generate(&mock, "Summarize X", n).await.unwrap_err();
            assert_eq!(err.field(), Some("num_versions"), "versions={}", n);
        }
        assert!(generate(&mock, "  ", 3).await.unwrap_err().is_validation());
        assert_eq!(mock.total_calls(), 0);
    }

    /// Same sequence the blind results page runs.
    async fn select(mock: &MockBackend, session: &mut BlindSession, index: usize) -> ClientResult<()> {
        let Some(claim) = session.begin_selection(index)? else {
            return Ok(());
        };
        let result = persist_choice(mock, &claim).await;
        assert!(session.finish_selection(&claim));
        result
    }

    fn labels(session: &BlindSession) -> Vec<String> {
        session.views().into_iter().map(|v| v.label).collect()
    }

    #[tokio::test]
    async fn test_generate_hides_models_until_selection() {
        let mock = MockBackend::new();
        script_three(&mock);

        let session = generate(&mock, "Summarize X", 3).await.unwrap();
        assert_eq!(session.len(), 3);
        assert!(!session.revealed());
        assert_eq!(session.model(0), None);
        assert_eq!(labels(&session), vec!["Version 1", "Version 2", "Version 3"]);
        assert_eq!(session.phase(), BlindPhase::Generated);
        assert_eq!(mock.calls()[0].body, json!({"user_query": "Summarize X", "num_versions": 3}));
    }

    #[tokio::test]
    async fn test_select_reveals_all_models_and_persists_choice() {
        let mock = MockBackend::new();
        script_three(&mock);
        let mut session = generate(&mock, "Summarize X", 3).await.unwrap();

        select(&mock, &mut session, 1).await.unwrap();

        assert!(session.revealed());
        assert_eq!(session.chosen_index(), Some(1));
        assert_eq!(session.phase(), BlindPhase::Selected);
        assert_eq!(labels(&session), vec!["gpt-4o", "claude-3-7-sonnet-latest", "gpt-4o-mini"]);
        assert!(session.views()[1].chosen);

        let call = mock.calls().pop().unwrap();
        assert_eq!(call.op, "update_evaluation");
        assert_eq!(call.id.as_deref(), Some("blind-1"));
        assert_eq!(
            call.body,
            json!({"chosen_model_after_blind_results": "claude-3-7-sonnet-latest"})
        );
    }

    #[tokio::test]
    async fn test_models_stay_hidden_while_choice_is_saving() {
        let mock = MockBackend::new();
        script_three(&mock);
        let mut session = generate(&mock, "Summarize X", 3).await.unwrap();

        let claim = session.begin_selection(2).unwrap().unwrap();
        assert_eq!(session.phase(), BlindPhase::Selected);
        assert!(!session.revealed());
        assert_eq!(session.model(2), None);
        assert!(session.begin_selection(0).unwrap().is_none());

        assert!(session.finish_selection(&claim));
        assert_eq!(session.model(2), Some("gpt-4o-mini"));
    }

    #[tokio::test]
    async fn test_second_selection_is_ignored() {
        let mock = MockBackend::new();
        script_three(&mock);
        let mut session = generate(&mock, "Summarize X", 3).await.unwrap();

        select(&mock, &mut session, 1).await.unwrap();
        select(&mock, &mut session, 2).await.unwrap();

        assert_eq!(session.chosen_index(), Some(1));
        assert_eq!(mock.count("update_evaluation"), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_selection_is_rejected() {
        let mock = MockBackend::new();
        script_three(&mock);
        let mut session = generate(&mock, "Summarize X", 3).await.unwrap();

        assert!(select(&mock, &mut session, 3).await.unwrap_err().is_validation());
        assert_eq!(session.chosen_index(), None);
        assert!(!session.revealed());
        assert_eq!(mock.count("update_evaluation"), 0);
    }

    #[tokio::test]
    async fn test_reveal_happens_even_when_persisting_fails() {
        let mock = MockBackend::new();
        script_three(&mock);
        let mut session = generate(&mock, "Summarize X", 3).await.unwrap();

        mock.push_err(
            "update_evaluation",
            ClientError::Http {
                status: 500,
                context: "Updating evaluation",
            },
        );
        assert!(select(&mock, &mut session, 0).await.is_err());

        assert!(session.revealed());
        assert_eq!(session.chosen_index(), Some(0));
        assert_eq!(session.model(0), Some("gpt-4o"));
    }

    #[tokio::test]
    async fn test_missing_id_still_reveals() {
        let mock = MockBackend::new();
        mock.push_ok(
            "create_blind_results",
            json!({"blind_results": [{"model": "m1", "response": "r1"}, {"model": "m2", "response": "r2"}]}),
        );
        let mut session = generate(&mock, "q", 2).await.unwrap();

        let err = select(&mock, &mut session, 0).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingReference(_)));
        assert!(session.revealed());
        assert_eq!(mock.count("update_evaluation"), 0);
    }

    #[tokio::test]
    async fn test_candidate_without_model_keeps_the_rest() {
        let mock = MockBackend::new();
        mock.push_ok(
            "create_blind_results",
            json!({
                "_id": "blind-3",
                "blind_results": [{"model": "m1", "response": "a"}, {"response": "b"}]
            }),
        );
        let mut session = generate(&mock, "q", 2).await.unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(labels(&session), vec!["Version 1", "Version 2"]);
        assert_eq!(session.views()[1].response, "b");

        // Choosing it reveals, but there is nothing to record.
        let err = select(&mock, &mut session, 1).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingReference(_)));
        assert!(session.revealed());
        assert_eq!(labels(&session), vec!["m1", "Unknown model"]);
        assert_eq!(mock.count("update_evaluation"), 0);
    }

    #[tokio::test]
    async fn test_response_without_blind_results_fails() {
        let mock = MockBackend::new();
        mock.push_ok("create_blind_results", json!({"_id": "blind-2"}));
        let err = generate(&mock, "q", 2).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_result_for_replaced_session_is_ignored() {
        let mock = MockBackend::new();
        script_three(&mock);
        let mut first = generate(&mock, "Summarize X", 3).await.unwrap();
        let claim = first.begin_selection(0).unwrap().unwrap();

        // A new session arrives before the choice is saved.
        script_three(&mock);
        let mut second = generate(&mock, "Summarize Y", 3).await.unwrap();
        assert!(!second.finish_selection(&claim));
        assert!(!second.revealed());
        assert_eq!(second.chosen_index(), None);

        // Same id, different pick: still not this claim.
        second.begin_selection(1).unwrap();
        assert!(!second.finish_selection(&claim));
        assert!(!second.revealed());

        assert!(first.finish_selection(&claim));
        assert!(!first.finish_selection(&claim));
    }
}
