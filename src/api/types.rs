//! Request and response bodies of the REST backend.
//!
//! Field names match the backend JSON exactly. Response fields are optional
//! because the backend returns partial documents on some paths.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// -- Users --

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub full_name: Option<String>,
}

// -- Evaluations --

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRequest {
    pub user_query: String,
    pub provider: String,
    pub model: String,
    pub evaluation_method: String,
}

/// `reasons` arrives either as a list or as one block of text.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Reasons {
    List(Vec<String>),
    Text(String),
}

impl Reasons {
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Reasons::List(items) => items,
            Reasons::Text(text) if text.trim().is_empty() => Vec::new(),
            Reasons::Text(text) => vec![text],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationResult {
    #[serde(default)]
    pub prompt_rating: Option<Value>,
    #[serde(default)]
    pub reasons: Option<Reasons>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationResponse {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub evaluation_result: Option<EvaluationResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Worse,
    Tie,
    Better,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Worse, Verdict::Tie, Verdict::Better];

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Worse => "Worse",
            Verdict::Tie => "Tie",
            Verdict::Better => "Better",
        }
    }
}

/// Partial update sent to `PUT /evaluations/{id}`. Unset fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_verdict_after_comparison: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_model_after_blind_results: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareRequest {
    pub user_query: String,
    pub optimized_user_query: String,
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedComparison {
    #[serde(default)]
    pub default_query_response: Option<Value>,
    #[serde(default)]
    pub optimized_query_response: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompareResponse {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub parsed_result_after_comparison: Option<ParsedComparison>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlindRequest {
    pub user_query: String,
    pub num_versions: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlindResult {
    /// Empty when the backend omitted it for this candidate.
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub response: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlindResponse {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub blind_results: Option<Vec<BlindResult>>,
}

// -- Optimizations --

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationRequest {
    pub user_query: String,
    pub provider: String,
    pub model: String,
    pub technique: String,
    pub number_of_iterations: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptimizationResponse {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_query: Option<String>,
    #[serde(default)]
    pub technique: Option<String>,
    #[serde(default)]
    pub final_optimized_query: Option<String>,
    #[serde(default)]
    pub raw_output: Option<Value>,
    #[serde(default)]
    pub expert_persona_text: Option<String>,
    #[serde(default)]
    pub emotional_stimuli_text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationUpdate {
    pub final_optimized_query: String,
}

/// Renders a JSON payload for display: strings verbatim, everything else
/// pretty-printed.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
