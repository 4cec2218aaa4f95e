//! Static choices offered by the forms: providers, their models, techniques
//! and evaluation methods. Values are forwarded to the backend opaquely.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

const fn choice(value: &'static str, label: &'static str) -> Choice {
    Choice { value, label }
}

pub const PROVIDERS: &[Choice] = &[choice("openai", "OpenAI"), choice("claude", "Claude")];

const OPENAI_MODELS: &[Choice] = &[
    choice("gpt-3.5-turbo", "gpt-3.5-turbo"),
    choice("gpt-4o", "gpt-4o"),
    choice("gpt-4o-mini", "gpt-4o-mini"),
    choice("o3-mini", "o3-mini"),
];

const CLAUDE_MODELS: &[Choice] = &[
    choice("claude-3-haiku-20240307", "claude-3-haiku-20240307"),
    choice("claude-3-5-haiku-latest", "claude-3-5-haiku-latest"),
    choice("claude-3-7-sonnet-latest", "claude-3-7-sonnet-latest"),
];

pub const TECHNIQUES: &[Choice] = &[
    choice("CoT", "Chain of Thought (CoT)"),
    choice("SC", "Self-Consistency (SC)"),
    choice("CoD", "Chain of Draft (CoD)"),
    choice("PC", "Prompt Chaining (PC)"),
    choice("ReAct", "ReAct"),
    choice("SC_ReAct", "SC + ReAct"),
];

pub const EVALUATION_METHODS: &[Choice] = &[choice("human", "Human"), choice("llm", "LLM")];

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_TECHNIQUE: &str = "CoT";

/// Models offered for `provider`; unknown providers have none.
pub fn models_for(provider: &str) -> &'static [Choice] {
    match provider {
        "openai" => OPENAI_MODELS,
        "claude" => CLAUDE_MODELS,
        _ => &[],
    }
}

/// The model a form resets to when the provider changes.
pub fn default_model(provider: &str) -> &'static str {
    models_for(provider).first().map(|c| c.value).unwrap_or_default()
}
